//! Per-call generation context and the session point of reference.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use super::accessible::{AccessibleRef, NativeId};
use super::error::{AccessError, ConfigError, EvaluationError, GenerationError};
use super::role::Role;

/// Presentation mode; selects the format expression within a role entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatMode {
    Focused,
    Unfocused,
    BasicWhereAmI,
    DetailedWhereAmI,
    /// Used when presenting a container of the object of interest.
    Ancestor,
}

impl FormatMode {
    pub const ALL: [FormatMode; 5] = [
        FormatMode::Focused,
        FormatMode::Unfocused,
        FormatMode::BasicWhereAmI,
        FormatMode::DetailedWhereAmI,
        FormatMode::Ancestor,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FormatMode::Focused => "focused",
            FormatMode::Unfocused => "unfocused",
            FormatMode::BasicWhereAmI => "basicWhereAmI",
            FormatMode::DetailedWhereAmI => "detailedWhereAmI",
            FormatMode::Ancestor => "ancestor",
        }
    }

    pub fn is_where_am_i(self) -> bool {
        matches!(self, FormatMode::BasicWhereAmI | FormatMode::DetailedWhereAmI)
    }
}

impl FromStr for FormatMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatMode::ALL
            .iter()
            .copied()
            .find(|m| m.key() == s)
            .ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputChannel {
    Speech,
    Braille,
}

impl FromStr for OutputChannel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "speech" => Ok(OutputChannel::Speech),
            "braille" => Ok(OutputChannel::Braille),
            other => Err(ConfigError::UnknownChannel(other.to_string())),
        }
    }
}

pub const LAST_ROW: &str = "lastRow";
pub const LAST_COLUMN: &str = "lastColumn";
pub const LAST_NODE_LEVEL: &str = "lastNodeLevel";

#[derive(Debug, Clone, PartialEq)]
pub enum PorValue {
    Int(i64),
    Text(String),
    Flag(bool),
    Object(NativeId),
}

/// Small persisted state that lets a call compare against the previous one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointOfReference {
    values: HashMap<String, PorValue>,
}

impl PointOfReference {
    pub fn new() -> Self {
        PointOfReference {
            values: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PorValue> {
        self.values.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(PorValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: PorValue) {
        self.values.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<PorValue> {
        self.values.remove(key)
    }

    pub fn last_row(&self) -> Option<usize> {
        self.get_int(LAST_ROW).and_then(|v| usize::try_from(v).ok())
    }

    pub fn last_column(&self) -> Option<usize> {
        self.get_int(LAST_COLUMN).and_then(|v| usize::try_from(v).ok())
    }

    /// Apply a batch of staged updates in one step.
    pub fn apply(&mut self, updates: HashMap<String, PorValue>) {
        self.values.extend(updates);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

struct Frame {
    id: NativeId,
    role: Role,
    saved_override: Option<Role>,
}

/// Mutable state threaded through one generation pass.
///
/// The point of reference is a read-only copy of the session value. Updates
/// are staged and only reach the session when the outermost call succeeds.
pub struct Context {
    role_override: Option<Role>,
    pub already_focused: bool,
    pub format_mode: FormatMode,
    pub channel: OutputChannel,
    pub include_context: bool,
    pub reading_row: bool,
    pub prior_object: Option<AccessibleRef>,
    point_of_reference: PointOfReference,
    pending: HashMap<String, PorValue>,
    frames: Vec<Frame>,
    max_depth: usize,
    overrides: usize,
    restores: usize,
}

impl Context {
    pub fn new(format_mode: FormatMode, channel: OutputChannel) -> Self {
        Context {
            role_override: None,
            already_focused: false,
            format_mode,
            channel,
            include_context: true,
            reading_row: false,
            prior_object: None,
            point_of_reference: PointOfReference::new(),
            pending: HashMap::new(),
            frames: Vec::new(),
            max_depth: 16,
            overrides: 0,
            restores: 0,
        }
    }

    pub fn with_point_of_reference(mut self, por: PointOfReference) -> Self {
        self.point_of_reference = por;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_prior_object(mut self, prior: Option<AccessibleRef>) -> Self {
        self.prior_object = prior;
        self
    }

    /// Install `role` as the active override; returns what it replaced.
    pub fn override_role(&mut self, role: Role) -> Option<Role> {
        self.overrides += 1;
        self.role_override.replace(role)
    }

    /// Reinstate the value returned by the matching `override_role`.
    pub fn restore_role(&mut self, previous: Option<Role>) {
        self.restores += 1;
        self.role_override = previous;
    }

    /// Override the role until the returned guard is dropped.
    pub fn scoped_role(&mut self, role: Role) -> RoleGuard<'_> {
        let previous = self.override_role(role);
        RoleGuard {
            ctx: self,
            previous,
        }
    }

    pub fn role_override(&self) -> Option<Role> {
        self.role_override
    }

    /// `(override_role calls, restore_role calls)` so far.
    pub fn override_balance(&self) -> (usize, usize) {
        (self.overrides, self.restores)
    }

    /// The role `obj` is being presented as: the active override, else the
    /// role it was entered with, else its own role.
    pub fn role_for(&self, obj: &AccessibleRef) -> Result<Role, AccessError> {
        if let Some(role) = self.role_override {
            return Ok(role);
        }
        match self.frames.last() {
            Some(frame) if &frame.id == obj.id() => Ok(frame.role),
            _ => obj.role(),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Begin generating `obj`. The pending override (if any) is consumed as
    /// the object's role for this frame and handed back by [`Context::leave`].
    pub fn enter(&mut self, obj: &AccessibleRef) -> Result<Role, GenerationError> {
        let role = match self.role_override {
            Some(role) => role,
            None => obj.role()?,
        };
        if self.frames.len() >= self.max_depth {
            return Err(EvaluationError::DepthExceeded(self.max_depth).into());
        }
        if self
            .frames
            .iter()
            .any(|f| f.role == role && &f.id == obj.id())
        {
            return Err(EvaluationError::Reentrant {
                id: obj.id().clone(),
                role,
            }
            .into());
        }
        self.frames.push(Frame {
            id: obj.id().clone(),
            role,
            saved_override: self.role_override.take(),
        });
        Ok(role)
    }

    pub fn leave(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.role_override = frame.saved_override;
        }
    }

    pub fn point_of_reference(&self) -> &PointOfReference {
        &self.point_of_reference
    }

    /// Stage a point-of-reference update for commit after the call.
    pub fn stage(&mut self, key: impl Into<String>, value: PorValue) {
        self.pending.insert(key.into(), value);
    }

    pub fn staged(&self, key: &str) -> Option<&PorValue> {
        self.pending.get(key)
    }

    pub(crate) fn checkpoint(&self) -> HashMap<String, PorValue> {
        self.pending.clone()
    }

    pub(crate) fn rollback(&mut self, checkpoint: HashMap<String, PorValue>) {
        self.pending = checkpoint;
    }

    pub fn take_pending(&mut self) -> HashMap<String, PorValue> {
        std::mem::take(&mut self.pending)
    }
}

/// Restores the overridden role when dropped, on every exit path.
pub struct RoleGuard<'a> {
    ctx: &'a mut Context,
    previous: Option<Role>,
}

impl Deref for RoleGuard<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.ctx
    }
}

impl DerefMut for RoleGuard<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.ctx
    }
}

impl Drop for RoleGuard<'_> {
    fn drop(&mut self) {
        self.ctx.restore_role(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_and_restore() {
        let mut ctx = Context::new(FormatMode::Focused, OutputChannel::Speech);
        let previous = ctx.override_role(Role::ComboBox);
        assert_eq!(previous, None);
        let inner = ctx.override_role(Role::CheckBox);
        assert_eq!(inner, Some(Role::ComboBox));
        ctx.restore_role(inner);
        assert_eq!(ctx.role_override(), Some(Role::ComboBox));
        ctx.restore_role(previous);
        assert_eq!(ctx.role_override(), None);
        assert_eq!(ctx.override_balance(), (2, 2));
    }

    #[test]
    fn test_scoped_role_restores_on_early_return() {
        fn bail(ctx: &mut Context) -> Result<(), ()> {
            let guard = ctx.scoped_role(Role::RealTableCell);
            assert_eq!(guard.role_override(), Some(Role::RealTableCell));
            Err(())
        }
        let mut ctx = Context::new(FormatMode::Focused, OutputChannel::Speech);
        assert!(bail(&mut ctx).is_err());
        assert_eq!(ctx.role_override(), None);
        assert_eq!(ctx.override_balance(), (1, 1));
    }

    #[test]
    fn test_format_mode_keys() {
        for mode in FormatMode::ALL {
            assert_eq!(mode.key().parse::<FormatMode>().unwrap(), mode);
        }
        assert!("sideways".parse::<FormatMode>().is_err());
    }

    #[test]
    fn test_point_of_reference_apply() {
        let mut por = PointOfReference::new();
        let mut updates = HashMap::new();
        updates.insert(LAST_ROW.to_string(), PorValue::Int(3));
        updates.insert(LAST_COLUMN.to_string(), PorValue::Int(1));
        por.apply(updates);
        assert_eq!(por.last_row(), Some(3));
        assert_eq!(por.last_column(), Some(1));
    }
}
