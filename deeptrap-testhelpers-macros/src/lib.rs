use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    // Attributes, visibility and qualifiers ahead of `fn`.
    struct Prefix {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    // Generics, arguments and return type: everything up to the body.
    struct Signature {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct Body {
        block: BraceGroup,
    }

    struct TestFn {
        prefix: Prefix, _fn: KFn, name: Ident,
        signature: Signature, body: Body
    }
}

impl quote::ToTokens for Prefix {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Body {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        tokens.extend(self.block.0.stream())
    }
}

/// Test attribute that installs the deeptrap test subscriber before the body runs.
///
/// ```ignore
/// use deeptrap_testhelpers::test;
///
/// #[test]
/// fn my_test() {
///     // tracing output goes to the test's stderr
/// }
/// ```
///
/// A different harness attribute can be passed as the argument:
/// `#[deeptrap_testhelpers::test(other::test)]`.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let mut tokens = item.to_token_iter();
    let Ok(TestFn {
        prefix,
        _fn,
        name,
        signature,
        body,
    }) = tokens.parse::<TestFn>()
    else {
        return quote::quote! {
            ::core::compile_error!("#[deeptrap_testhelpers::test] expects a function with a body");
        }
        .into();
    };

    let test_attr = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote::quote! { #[#attr] }
    };

    quote::quote! {
        #test_attr
        #prefix fn #name #signature {
            ::deeptrap_testhelpers::setup();

            #body
        }
    }
    .into()
}
