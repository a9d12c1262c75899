mod delete;
mod handler;
mod sequence;

use deeptrap::{DeleteEvent, HandlerError, MutationHandler, Path, SetEvent};

/// Records every event as one line, and can be told to reject or fail writes
/// at given paths.
#[derive(Debug, Default)]
pub struct Recorder {
    pub log: Vec<String>,
    pub reject: Vec<Vec<String>>,
    pub fail: Vec<Vec<String>>,
}

impl Recorder {
    pub fn rejecting(path: &[&str]) -> Self {
        Self {
            reject: vec![keys(path)],
            ..Self::default()
        }
    }

    pub fn failing(path: &[&str]) -> Self {
        Self {
            fail: vec![keys(path)],
            ..Self::default()
        }
    }

    /// The log so far, one event per line.
    pub fn take_log(&mut self) -> String {
        core::mem::take(&mut self.log).join("\n")
    }
}

fn keys(path: &[&str]) -> Vec<String> {
    path.iter().map(|k| (*k).to_owned()).collect()
}

fn target_name(path: &Path) -> String {
    if path.is_empty() {
        "root".to_owned()
    } else {
        path.to_string()
    }
}

impl MutationHandler for Recorder {
    fn set(&mut self, event: SetEvent<'_>) -> Result<bool, HandlerError> {
        assert!(event.root.path().is_empty(), "root is the tree root");
        assert_eq!(event.receiver, event.target.id());
        if let Some(node) = event.value.as_node() {
            assert!(node.parent().is_none(), "written containers attach on commit");
        }

        let keys = event.path.keys();
        self.log.push(format!(
            "set {keys:?} = {:?} on {}",
            event.value.to_value(),
            target_name(&event.target.path()),
        ));
        if self.fail.contains(&keys) {
            return Err(format!("refusing to write {}", event.path).into());
        }
        Ok(!self.reject.contains(&keys))
    }

    fn delete_property(&mut self, event: DeleteEvent<'_>) -> Result<bool, HandlerError> {
        assert!(event.root.path().is_empty(), "root is the tree root");

        let keys = event.path.keys();
        self.log.push(format!(
            "delete {keys:?} on {}",
            target_name(&event.target.path()),
        ));
        if self.fail.contains(&keys) {
            return Err(format!("refusing to delete {}", event.path).into());
        }
        Ok(true)
    }
}
