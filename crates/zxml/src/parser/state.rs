//! Parser state enums

/// Which buffer a plain character inside `<...>` goes to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum TagState {
    #[default]
    Idle,
    Name,
    AttrName,
    AttrValue,
}

/// Inside a node definition or between tags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Section {
    Definition,
    #[default]
    Data,
}

/// Progress through a `<?xml ...?>` declaration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum HeaderState {
    #[default]
    NotSet,
    Begin,
    End,
}
