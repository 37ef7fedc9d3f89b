use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecifierError {
    #[error("Empty version specifier")]
    Empty,

    #[error("Version specifier has no major version: {0}")]
    MissingMajor(String),

    #[error("Version specifier has more than three components: {0}")]
    TooManyComponents(String),

    #[error("Fixed component after wildcard in version specifier: {0}")]
    FixedAfterWildcard(String),

    #[error("Invalid component '{component}' in version specifier: {specifier}")]
    InvalidComponent {
        specifier: String,
        component: String,
    },
}
