//! Persisted project document codec.
//!
//! Stores have held the document in several shapes over time. Decoding
//! accepts all of them:
//!
//! | stored value                  | decoded as                          |
//! |-------------------------------|-------------------------------------|
//! | root folder object            | that folder                         |
//! | JSON string holding the above | the folder inside the string        |
//! | bare array of items           | items wrapped in a folder `Root`    |
//! | nothing / `null`              | empty folder `Root`                 |
//!
//! Every decoded tree is checked like a mutation result: names must be
//! valid path segments and siblings must have distinct display names.
//!
//! Encoding always produces the root folder object.

use playground_core::{Error, Result};
use playground_tree::{FolderNode, TreeNode, validate_tree};
use serde_json::Value;

/// Name of the root folder synthesized for bare or missing documents.
pub const DEFAULT_ROOT_NAME: &str = "Root";

/// Decodes a stored document into a validated, sorted tree.
///
/// # Errors
///
/// Returns `Error::SerializationError` if the value is not one of the
/// accepted shapes, `Error::InvalidPath` for a name that is not a valid
/// path segment and `Error::DuplicateName` for repeated siblings.
///
/// # Examples
///
/// ```
/// use playground_session::decode_document;
/// use serde_json::json;
///
/// let legacy = json!(r#"{"folderName":"app","items":[]}"#);
/// assert_eq!(decode_document(Some(legacy)).unwrap().folder_name, "app");
///
/// let bare = json!([{"filename": "a", "fileExtension": "ts", "content": ""}]);
/// let root = decode_document(Some(bare)).unwrap();
/// assert_eq!(root.folder_name, "Root");
/// assert_eq!(root.items.len(), 1);
///
/// assert!(decode_document(None).unwrap().items.is_empty());
/// ```
pub fn decode_document(value: Option<Value>) -> Result<FolderNode> {
    let value = match value {
        Some(Value::String(text)) => {
            serde_json::from_str(&text).map_err(|e| Error::serialization("stored string is not JSON", e))?
        }
        Some(value) => value,
        None => Value::Null,
    };

    let mut root = match value {
        Value::Null => FolderNode::new(DEFAULT_ROOT_NAME),
        Value::Array(_) => {
            let items: Vec<TreeNode> = serde_json::from_value(value)
                .map_err(|e| Error::serialization("invalid item list", e))?;
            FolderNode {
                folder_name: DEFAULT_ROOT_NAME.to_string(),
                items,
            }
        }
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| Error::serialization("invalid project document", e))?,
        other => {
            return Err(Error::SerializationError {
                message: format!("unsupported project document: {other}"),
                source: None,
            });
        }
    };

    validate_tree(&root)?;
    root.sort_recursive();
    Ok(root)
}

/// Encodes a tree as the stored document.
///
/// # Errors
///
/// Returns `Error::SerializationError` if serialization fails.
pub fn encode_document(root: &FolderNode) -> Result<Value> {
    serde_json::to_value(root).map_err(|e| Error::serialization("failed to encode project", e))
}
