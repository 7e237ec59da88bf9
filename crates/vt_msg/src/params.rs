//! CSI parameter grammar (spec §4.1.1).
//!
//! A CSI sequence carries an optional private marker, a list of
//! semicolon-separated parameters (each of which may itself carry
//! colon-separated sub-parameters, needed to tell `38;5;n` apart from
//! `38:5:n`), and a run of intermediate bytes before the final byte.

/// One parameter slot. `38:5:234` decodes to `SubParams(vec![38, 5, 234])`
/// with `colon_separated = true`; `38;5;234` decodes to three separate
/// single-value slots with `colon_separated = false`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubParams {
    pub values: Vec<u16>,
    pub colon_separated: bool,
}

impl SubParams {
    pub fn single(value: u16) -> Self {
        SubParams {
            values: vec![value],
            colon_separated: false,
        }
    }

    pub fn first(&self) -> Option<u16> {
        self.values.first().copied()
    }
}

/// Parsed CSI parameter list plus the leading private marker and trailing
/// intermediate bytes, per spec §4.1.1.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsiParams {
    /// One of `?` `>` `=` `<`, captured separately from the parameter list.
    pub private_marker: Option<u8>,
    pub params: Vec<SubParams>,
    pub intermediates: Vec<u8>,
}

impl CsiParams {
    /// Returns the Nth top-level parameter's first value, or `default` if
    /// the parameter is missing or was left empty (e.g. `CSI ;5H`).
    pub fn get(&self, index: usize, default: u16) -> u16 {
        self.params.get(index).and_then(SubParams::first).unwrap_or(default)
    }

    /// Parameter value clamped to at least 1, the common "count" default
    /// used by CUU/CUD/IL/DL/etc: a missing or zero parameter means 1.
    pub fn count(&self, index: usize) -> u16 {
        match self.get(index, 1) {
            0 => 1,
            n => n,
        }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// All top-level parameters' first values, substituting `default` for
    /// empty slots. Used by DECSET/DECRST/SM/RM, which apply to every
    /// parameter in the list.
    pub fn all(&self, default: u16) -> Vec<u16> {
        self.params.iter().map(|p| p.first().unwrap_or(default)).collect()
    }
}
