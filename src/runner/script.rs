//! The per-application collaborator.
//!
//! A [`Script`] answers the questions the generation core deliberately does
//! not decide for itself: which containers are purely structural, whether two
//! handles denote the same object, and what text or label a widget displays.
//! Applications whose toolkits need different heuristics implement the trait
//! and override only what differs.

use crate::runner::ds::accessible::AccessibleRef;
use crate::runner::ds::error::AccessError;
use crate::runner::ds::role::Role;

pub trait Script {
    /// Whether `obj` exists only for layout and should never be presented as
    /// context.
    fn is_layout_only(&self, obj: &AccessibleRef) -> Result<bool, AccessError> {
        if obj.attribute("layout-guess")?.as_deref() == Some("true") {
            return Ok(true);
        }
        let role = obj.role()?;
        let structural = matches!(
            role,
            Role::Panel
                | Role::Filler
                | Role::Section
                | Role::Grouping
                | Role::Redundant
                | Role::Unknown
                | Role::ScrollPane
                | Role::Extended
        );
        Ok(structural && obj.name()?.is_none() && self.displayed_label(obj)?.is_none())
    }

    /// Identity comparison that survives toolkits replacing object instances.
    fn is_same_object(&self, a: &AccessibleRef, b: &AccessibleRef) -> bool {
        a == b || a.id() == b.id()
    }

    /// The text a sighted user sees on `obj`.
    fn displayed_text(&self, obj: &AccessibleRef) -> Result<Option<String>, AccessError> {
        if let Some(name) = obj.name()? {
            return Ok(Some(name));
        }
        match obj.query_text() {
            Ok(text) => {
                let trimmed = text.text.trim();
                Ok(if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                })
            }
            Err(AccessError::CapabilityUnavailable(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The label of `obj`, from its labelled-by relation.
    fn displayed_label(&self, obj: &AccessibleRef) -> Result<Option<String>, AccessError> {
        let mut parts = vec![];
        for label in obj.labelled_by()? {
            if self.is_same_object(&label, obj) {
                continue;
            }
            if let Some(text) = self.displayed_text(&label)? {
                parts.push(text);
            }
        }
        Ok(if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        })
    }
}

/// Script with the stock heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultScript;

impl Script for DefaultScript {}
