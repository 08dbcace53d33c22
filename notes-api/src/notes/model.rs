use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub type NoteId = i64;

pub const TITLE_MAX_LEN: usize = 100;

#[derive(Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

/// Body of both `POST /notes` and `PUT /notes/{id}`; both fields are required.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
}

pub type CreateNote = NoteForm;
pub type UpdateNote = NoteForm;

impl NoteForm {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Title must not be empty".into()));
        }
        if self.title.chars().any(char::is_control) {
            return Err(Error::InvalidInput("Title must not contain control characters".into()));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(Error::InvalidInput(format!(
                "Title must be at most {TITLE_MAX_LEN} characters"
            )));
        }
        Ok(())
    }
}
