//! Analysis configuration.

/// Replacement spellings for the narrowed forms.
#[derive(Clone, Debug)]
pub struct RewriteNames {
    /// Head name replacing the shared-ownership type head
    /// (`shared_ptr` -> this).
    pub exclusive_type: String,
    /// Callee name replacing the shared-ownership factory
    /// (`make_shared` -> this).
    pub exclusive_factory: String,
}

impl Default for RewriteNames {
    fn default() -> Self {
        RewriteNames {
            exclusive_type: "unique_ptr".to_string(),
            exclusive_factory: "make_unique".to_string(),
        }
    }
}

/// Which checks run, plus policy overrides.
#[derive(Clone, Debug)]
pub struct NarrowConfig {
    /// Rewrite factory functions returning shared-ownership values.
    pub factory_returns: bool,
    /// Rewrite private shared-ownership data members.
    pub data_members: bool,
    /// Rewrite shared-ownership parameters to raw pointers.
    pub parameters: bool,
    /// Free functions trusted not to retain their arguments. Empty by
    /// default: passing a candidate to an unknown free function is an
    /// escape.
    pub trusted_callees: Vec<String>,
    pub names: RewriteNames,
}

impl Default for NarrowConfig {
    fn default() -> Self {
        NarrowConfig {
            factory_returns: true,
            data_members: true,
            parameters: true,
            trusted_callees: Vec::new(),
            names: RewriteNames::default(),
        }
    }
}
