use serde::{Deserialize, Serialize};

use crate::model::ids::TagId;

/// An entry in the shared tag dictionary. Names are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}
