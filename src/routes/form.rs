//! Multipart form helpers

use std::collections::HashMap;

use axum::{body::Bytes, extract::Multipart};

use crate::error::{AppError, Result};

/// All parts of a multipart form, keyed by field name
#[derive(Debug, Default)]
pub struct FormFields {
    parts: HashMap<String, Bytes>,
}

impl FormFields {
    /// Drain a multipart body; later duplicates of a field win
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut fields = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let data = field.bytes().await?;
            fields.parts.insert(name, data);
        }
        Ok(fields)
    }

    /// Raw bytes of a part
    pub fn bytes(&self, name: &str) -> Option<&Bytes> {
        self.parts.get(name)
    }

    /// Non-empty UTF-8 text of a part
    pub fn text(&self, name: &str) -> Option<String> {
        self.parts
            .get(name)
            .and_then(|data| std::str::from_utf8(data).ok())
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    pub fn require_text(&self, name: &str) -> Result<String> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing {}", name)))
    }
}
