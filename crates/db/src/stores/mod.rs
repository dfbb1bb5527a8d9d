//! Entity stores.

pub mod attachment;
pub mod boxes;
pub mod item;
pub mod lookup;

pub use attachment::{AttachmentRow, AttachmentStore, UploadInput};
pub use boxes::{BoxItemRow, BoxRow, BoxStore, NewBox, NewBoxItem};
pub use item::{ItemRow, ItemStore, NewItem};
pub use lookup::{LookupKind, LookupRow, LookupStore};
