//! Global value metadata vocabulary.

/// What flavor of global a value handle is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum GlobalKind {
    /// A global variable with optional initializer.
    Variable,
    /// An alias for another global.
    Alias,
}

/// Linkage of a global value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Linkage {
    /// Visible to every module.
    #[default]
    External,
    /// Definition available for inlining, discarded after.
    AvailableExternally,
    /// Merged with same-named globals; unreferenced copies discarded.
    LinkOnceAny,
    /// Like `LinkOnceAny`, but all definitions must be equivalent.
    LinkOnceOdr,
    /// Merged with same-named globals, kept even if unreferenced.
    WeakAny,
    /// Like `WeakAny`, but all definitions must be equivalent.
    WeakOdr,
    /// Appended to same-named arrays at link time.
    Appending,
    /// Local to the module, renamable.
    Internal,
    /// Local to the module, omitted from the symbol table.
    Private,
    /// External weak reference; null when undefined.
    ExternalWeak,
    /// Tentative definition, merged at link time.
    Common,
}

/// Symbol visibility of a global value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Visibility {
    /// Visible per the linkage.
    #[default]
    Default,
    /// Not visible outside the linked image.
    Hidden,
    /// Visible but not preemptible.
    Protected,
}
