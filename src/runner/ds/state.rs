use bitflags::bitflags;

use super::error::ConfigError;

bitflags! {
    /// Semantic states of an accessible object at the time of its snapshot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateSet: u32 {
        const FOCUSED       = 1 << 0;
        const FOCUSABLE     = 1 << 1;
        const SHOWING       = 1 << 2;
        const VISIBLE       = 1 << 3;
        const SENSITIVE     = 1 << 4;
        const ENABLED       = 1 << 5;
        const CHECKABLE     = 1 << 6;
        const CHECKED       = 1 << 7;
        const INDETERMINATE = 1 << 8;
        const PRESSED       = 1 << 9;
        const EXPANDABLE    = 1 << 10;
        const EXPANDED      = 1 << 11;
        const SELECTABLE    = 1 << 12;
        const SELECTED      = 1 << 13;
        const EDITABLE      = 1 << 14;
        const READ_ONLY     = 1 << 15;
        const REQUIRED      = 1 << 16;
        const MULTI_LINE    = 1 << 17;
    }
}

impl StateSet {
    /// States every ordinary on-screen, usable object carries.
    pub fn interactive() -> Self {
        StateSet::SHOWING | StateSet::VISIBLE | StateSet::SENSITIVE | StateSet::ENABLED
    }

    /// Parse lower-case state names such as `"read_only"`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        let mut states = StateSet::empty();
        for name in names {
            let name = name.as_ref();
            let flag = StateSet::from_name(&name.to_ascii_uppercase())
                .ok_or_else(|| ConfigError::UnknownState(name.to_string()))?;
            states |= flag;
        }
        Ok(states)
    }
}
