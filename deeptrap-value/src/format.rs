//! JSON-like text formatting for Values.

use core::fmt::Write;

use crate::Value;

/// Format a Value as indented JSON-like text.
pub fn format_value(value: &Value) -> String {
    let mut ctx = FormatContext::new();
    format_value_into(&mut ctx, value);
    ctx.output
}

struct FormatContext {
    output: String,
    indent: usize,
}

impl FormatContext {
    const fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if c.is_control() => {
                    let _ = write!(self.output, "\\u{:04x}", c as u32);
                }
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }
}

fn format_value_into(ctx: &mut FormatContext, value: &Value) {
    match value {
        Value::Null => ctx.output.push_str("null"),
        Value::Bool(true) => ctx.output.push_str("true"),
        Value::Bool(false) => ctx.output.push_str("false"),
        Value::Number(n) => {
            let _ = write!(ctx.output, "{n}");
        }
        Value::String(s) => ctx.write_string(s),
        Value::Array(arr) => {
            if arr.is_empty() {
                ctx.output.push_str("[]");
                return;
            }
            ctx.output.push_str("[\n");
            ctx.indent += 1;
            for (i, item) in arr.iter().enumerate() {
                ctx.write_indent();
                format_value_into(ctx, item);
                if i + 1 < arr.len() {
                    ctx.output.push(',');
                }
                ctx.output.push('\n');
            }
            ctx.indent -= 1;
            ctx.write_indent();
            ctx.output.push(']');
        }
        Value::Object(obj) => {
            if obj.is_empty() {
                ctx.output.push_str("{}");
                return;
            }
            ctx.output.push_str("{\n");
            ctx.indent += 1;
            for (i, (key, val)) in obj.iter().enumerate() {
                ctx.write_indent();
                ctx.write_string(key);
                ctx.output.push_str(": ");
                format_value_into(ctx, val);
                if i + 1 < obj.len() {
                    ctx.output.push(',');
                }
                ctx.output.push('\n');
            }
            ctx.indent -= 1;
            ctx.write_indent();
            ctx.output.push('}');
        }
    }
}
