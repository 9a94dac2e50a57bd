//! The argument model (C2): an ordered list of named, typed, flagged slots.

use crate::error::{Error, Result};
use crate::pattern::Pattern;
use crate::value::Value;
use indexmap::IndexSet;

bitflags::bitflags! {
    /// Per-slot modifiers. A slot is positional and required unless one of
    /// these is set.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ArgFlag: u8 {
        /// Never fails to produce a value; falls back to `default` on
        /// mismatch or exhaustion instead of erroring.
        const OPTIONAL  = 0b0000_0001;
        /// Omitted from help/completion output.
        const HIDDEN    = 0b0000_0010;
        /// The slot's pattern is inverted (`Pattern::anti`).
        const ANTI      = 0b0000_0100;
        /// Only fillable by name, never positionally.
        const KW_ONLY   = 0b0000_1000;
        /// Repeats, collecting into a `Value::List`.
        const MULTIPLE  = 0b0001_0000;
        /// An `AllParam` slot that is allowed to cross into tokens that
        /// would otherwise belong to an outer scope's options.
        const GREEDY    = 0b0010_0000;
    }
}

/// What a slot actually matches against the stream.
#[derive(Clone)]
pub enum SlotValue {
    Pattern(Pattern),
    /// A nested argument list, e.g. for a compound positional.
    Nested(Box<Args>),
}

/// Non-matching metadata carried by a slot.
#[derive(Clone, Debug, Default)]
pub struct ArgField {
    pub default: Option<Value>,
    pub display: Option<String>,
    pub notice: Option<String>,
    pub completion_hint: Option<String>,
}

/// One entry in an [`Args`] list.
#[derive(Clone)]
pub struct ArgSlot {
    pub name: String,
    pub value: SlotValue,
    pub field: ArgField,
    pub flags: ArgFlag,
    pub separators: IndexSet<String>,
}

impl ArgSlot {
    /// Whether this is a hidden filler slot (names starting with `_key_`
    /// are synthesized by the grammar parser and never surface in queries).
    pub fn is_filler(&self) -> bool {
        self.name.starts_with("_key_")
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        match &self.value {
            SlotValue::Pattern(p) => Some(p),
            SlotValue::Nested(_) => None,
        }
    }
}

/// An ordered, typed argument list. Built once at command declaration time;
/// immutable once attached to a command or option.
#[derive(Clone, Default)]
pub struct Args {
    slots: Vec<ArgSlot>,
    separators: IndexSet<String>,
    var_positional: Option<usize>,
    var_keyword: Option<usize>,
}

impl Args {
    pub fn new() -> Self {
        let mut separators = IndexSet::new();
        separators.insert(" ".to_string());
        Args { slots: Vec::new(), separators, var_positional: None, var_keyword: None }
    }

    pub fn slots(&self) -> &[ArgSlot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn separators(&self) -> &IndexSet<String> {
        &self.separators
    }

    pub fn with_separators(mut self, seps: impl IntoIterator<Item = String>) -> Self {
        self.separators = seps.into_iter().collect();
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArgSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Appends a required positional slot.
    pub fn push(mut self, name: impl Into<String>, pattern: Pattern) -> Self {
        self.slots.push(ArgSlot {
            name: name.into(),
            value: SlotValue::Pattern(pattern),
            field: ArgField::default(),
            flags: ArgFlag::empty(),
            separators: self.separators.clone(),
        });
        self
    }

    /// Appends an optional positional slot with a default value used when
    /// the slot's pattern fails to match or the stream is exhausted.
    pub fn push_optional(
        mut self,
        name: impl Into<String>,
        pattern: Pattern,
        default: Value,
    ) -> Self {
        self.slots.push(ArgSlot {
            name: name.into(),
            value: SlotValue::Pattern(pattern),
            field: ArgField { default: Some(default), ..Default::default() },
            flags: ArgFlag::OPTIONAL,
            separators: self.separators.clone(),
        });
        self
    }

    /// Appends a keyword-only slot: only fillable when the analyser already
    /// knows the slot's name (used by option sub-args), never positionally.
    pub fn push_kw_only(mut self, name: impl Into<String>, pattern: Pattern) -> Self {
        self.slots.push(ArgSlot {
            name: name.into(),
            value: SlotValue::Pattern(pattern),
            field: ArgField::default(),
            flags: ArgFlag::KW_ONLY,
            separators: self.separators.clone(),
        });
        self
    }

    /// Appends the single variadic slot allowed per `Args` — consumes the
    /// rest of the stream (or, with `greedy`, the rest including tokens that
    /// would belong to an outer scope).
    pub fn push_variadic(mut self, name: impl Into<String>, pattern: Pattern, greedy: bool) -> Self {
        let mut flags = ArgFlag::MULTIPLE;
        if greedy {
            flags |= ArgFlag::GREEDY;
        }
        self.slots.push(ArgSlot {
            name: name.into(),
            value: SlotValue::Pattern(pattern),
            field: ArgField::default(),
            flags,
            separators: self.separators.clone(),
        });
        self.var_positional = Some(self.slots.len() - 1);
        self
    }

    pub fn push_nested(mut self, name: impl Into<String>, nested: Args) -> Self {
        self.slots.push(ArgSlot {
            name: name.into(),
            value: SlotValue::Nested(Box::new(nested)),
            field: ArgField::default(),
            flags: ArgFlag::empty(),
            separators: self.separators.clone(),
        });
        self
    }

    pub fn with_field(mut self, name: &str, field: ArgField) -> Self {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.name == name) {
            slot.field = field;
        }
        self
    }

    pub fn var_positional(&self) -> Option<&ArgSlot> {
        self.var_positional.map(|i| &self.slots[i])
    }

    pub fn kw_only_start_index(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.flags.contains(ArgFlag::KW_ONLY))
    }

    /// Validates the structural invariants from the data model: positional
    /// slots precede kw-only slots, at most one variadic, and every
    /// `optional` slot carries a default.
    pub fn validate(&self) -> Result<()> {
        let mut seen_kw_only = false;
        let mut variadic_count = 0;
        for slot in &self.slots {
            if slot.flags.contains(ArgFlag::KW_ONLY) {
                seen_kw_only = true;
            } else if seen_kw_only {
                return Err(Error::Declaration(format!(
                    "positional slot `{}` declared after a keyword-only slot",
                    slot.name
                )));
            }
            if slot.flags.contains(ArgFlag::MULTIPLE) {
                variadic_count += 1;
            }
            if slot.flags.contains(ArgFlag::OPTIONAL) && slot.field.default.is_none() {
                return Err(Error::Declaration(format!(
                    "optional slot `{}` has no default",
                    slot.name
                )));
            }
        }
        if variadic_count > 1 {
            return Err(Error::Declaration("at most one variadic slot is allowed".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern;

    #[test]
    fn rejects_optional_without_default() {
        let mut args = Args::new();
        args.slots.push(ArgSlot {
            name: "x".into(),
            value: SlotValue::Pattern(pattern::str_()),
            field: ArgField::default(),
            flags: ArgFlag::OPTIONAL,
            separators: args.separators.clone(),
        });
        assert!(args.validate().is_err());
    }

    #[test]
    fn rejects_positional_after_kw_only() {
        let args = Args::new().push_kw_only("k", pattern::str_()).push("p", pattern::str_());
        assert!(args.validate().is_err());
    }

    #[test]
    fn accepts_one_variadic() {
        let args = Args::new().push("a", pattern::str_()).push_variadic("rest", pattern::all_param(), false);
        assert!(args.validate().is_ok());
    }
}
