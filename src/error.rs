//! Error types for schema and data tree operations.
//!
//! Every error kind carries an enumerated code so callers can react to the
//! precise failure instead of parsing messages. Structural failures (path,
//! codec, model, argument) are returned immediately; value-level validation
//! failures are accumulated in a [`DiagnosticNode`](crate::diagnostics::DiagnosticNode)
//! tree and only become a [`DataValidationError`] once a full validation pass
//! has completed.

use crate::data::DataNodeId;
use serde::Serialize;
use std::fmt;

/// Main error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum YangError {
    /// A path expression could not be parsed, resolved or applied
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// A data tree failed validation
    #[error("Data validation error: {0}")]
    DataValidation(#[from] DataValidationError),

    /// A schema tree could not be constructed
    #[error("Schema validation error: {0}")]
    SchemaValidation(#[from] SchemaValidationError),

    /// Encoding or decoding a data tree failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// A model could not be located or resolved
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Invalid arguments were supplied to a call
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A call was made in an order the API does not allow
    #[error("Illegal state: {message}")]
    IllegalState { message: String },

    /// The operation is not supported by this implementation
    #[error("Operation not supported: {message}")]
    OperationNotSupported { message: String },

    /// Errors from an external executor or model provider
    #[error("Provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system errors while reading definitions or configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Path error sub-codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathErrorCode {
    /// Unexpected token in the expression
    UnexpectedToken,
    /// Unexpected end of the expression
    UnexpectedEof,
    /// Invalid operands of a predicate
    InvalidOperand,
    /// The context node cannot be used for this expression
    InvalidContext,
    /// Invalid characters in a name
    InvalidCharacter,
    /// Unknown module name
    InvalidModule,
    /// The first segment carries no module name
    MissingModule,
    /// No schema node with this name
    InvalidNode,
    /// Predicate names something that is not a key
    InvalidKey,
    /// Some list keys were not supplied
    MissingKey,
    /// The target node already exists
    Exists,
    /// Some parent of the target node is missing
    MissingParent,
    /// The expression does not identify a single node
    Ambiguous,
}

impl PathErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected token",
            Self::UnexpectedEof => "unexpected end of expression",
            Self::InvalidOperand => "invalid operand",
            Self::InvalidContext => "invalid context node",
            Self::InvalidCharacter => "invalid character",
            Self::InvalidModule => "invalid module name",
            Self::MissingModule => "missing module name",
            Self::InvalidNode => "invalid node name",
            Self::InvalidKey => "invalid key name",
            Self::MissingKey => "missing list key",
            Self::Exists => "target already exists",
            Self::MissingParent => "missing parent",
            Self::Ambiguous => "ambiguous path",
        }
    }
}

impl fmt::Display for PathErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to parse, resolve or apply a path expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code} in '{path}': {detail}")]
pub struct PathError {
    pub code: PathErrorCode,
    pub path: String,
    pub detail: String,
}

impl PathError {
    pub fn new(code: PathErrorCode, path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            detail: detail.into(),
        }
    }
}

/// Per-node data validation codes.
///
/// These are the entries of a diagnostics tree. They never abort a
/// validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    #[error("no schema node found for entity")]
    SchemaNotFound,
    #[error("schema node cannot have children or values here")]
    InvalidUseOfSchema,
    #[error("too many instances")]
    TooMany,
    #[error("duplicate leaf-list value")]
    DupLeafList,
    #[error("duplicate list instance")]
    DupList,
    #[error("unique leaves match on two list instances")]
    NoUniq,
    #[error("obsolete data instantiation")]
    ObsData,
    #[error("no resolvents found for an expression")]
    NoResolv,
    #[error("invalid element")]
    InElem,
    #[error("missing required element")]
    MissElem,
    #[error("invalid value")]
    Inval,
    #[error("invalid attribute value")]
    InvalAttr,
    #[error("invalid attribute")]
    InAttr,
    #[error("missing attribute")]
    MissAttr,
    #[error("value out of range, length or pattern")]
    NoConstr,
    #[error("unexpected characters")]
    InChar,
    #[error("predicate resolution failed")]
    InPred,
    #[error("data for more than one case of a choice")]
    McaseData,
    #[error("unsatisfied must condition")]
    NoMust,
    #[error("unsatisfied when condition")]
    NoWhen,
    #[error("invalid order of elements")]
    InOrder,
    #[error("irresolvable when condition")]
    InWhen,
    #[error("min-elements constraint not honored")]
    NoMin,
    #[error("max-elements constraint not honored")]
    NoMax,
    #[error("required instance does not exist")]
    NoReqIns,
    #[error("leafref target does not exist")]
    NoLeafref,
    #[error("no mandatory choice case branch exists")]
    NoMandChoice,
    #[error("invalid boolean value")]
    InvalidBoolVal,
    #[error("invalid empty value")]
    InvalidEmptyVal,
    #[error("pattern did not match")]
    InvalidPattern,
    #[error("invalid length")]
    InvalidLength,
    #[error("invalid identity")]
    InvalidIdentity,
    #[error("invalid enumeration")]
    InvalidEnum,
    #[error("range violation")]
    RangeViolation,
}

/// One failing node of a data validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeValidationError {
    pub node: DataNodeId,
    pub path: String,
    pub error: ValidationError,
}

/// Aggregate of all per-node failures found by a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} node(s) failed validation: {}", errors.len(), summary(errors))]
pub struct DataValidationError {
    pub errors: Vec<NodeValidationError>,
}

fn summary(errors: &[NodeValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.path, e.error))
        .collect::<Vec<_>>()
        .join(", ")
}

impl DataValidationError {
    /// Whether any failure for `node` carries `error`.
    pub fn contains(&self, node: DataNodeId, error: ValidationError) -> bool {
        self.errors
            .iter()
            .any(|e| e.node == node && e.error == error)
    }
}

/// Schema construction sub-codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaValidationCode {
    /// Invalid statement
    InStmt,
    /// Invalid identifier
    InId,
    /// Invalid date format
    InDate,
    /// Invalid statement argument
    InArg,
    /// Missing required statement
    MissStmt,
    /// Missing required statement argument
    MissArg,
    TooMany,
    /// Duplicated identifier
    DupId,
    DupLeafList,
    DupList,
    NoUniq,
    EnumDupVal,
    EnumDupName,
    /// Enum name with leading or trailing whitespace
    EnumWs,
    BitsDupVal,
    BitsDupName,
    /// Invalid module name
    InMod,
    /// List key is not a leaf
    KeyNLeaf,
    /// Invalid list key type
    KeyType,
    /// Key config value differs from the list config value
    KeyConfig,
    /// List key not found
    KeyMiss,
    /// Duplicated key identifier
    KeyDup,
    /// Invalid regular expression
    InRegex,
    /// No resolvents found
    InResolv,
    /// Invalid derivation because of status
    InStatus,
    CircLeafrefs,
    CircImports,
    CircIncludes,
}

impl fmt::Display for SchemaValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One failing schema statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    pub path: String,
    pub code: SchemaValidationCode,
    pub detail: String,
}

/// All problems found while constructing a schema tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} schema problem(s): {}", issues.len(), schema_summary(issues))]
pub struct SchemaValidationError {
    pub issues: Vec<SchemaIssue>,
}

fn schema_summary(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{} [{}] {}", i.path, i.code, i.detail))
        .collect::<Vec<_>>()
        .join("; ")
}

impl SchemaValidationError {
    pub fn single(
        path: impl Into<String>,
        code: SchemaValidationCode,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            issues: vec![SchemaIssue {
                path: path.into(),
                code,
                detail: detail.into(),
            }],
        }
    }

    pub fn has_code(&self, code: SchemaValidationCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

/// Codec sub-codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodecErrorCode {
    /// Missing markup object
    MissingMarkup,
    /// Invalid markup object
    InvalidMarkup,
    /// Invalid character in markup
    InvalidCharacter,
    /// Unexpected end of input data
    UnexpectedEof,
}

/// Encoding or decoding failure reported by a codec backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct CodecError {
    pub code: CodecErrorCode,
    pub message: String,
}

impl CodecError {
    pub fn new(code: CodecErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Model resolution failures raised while building a schema tree from
/// capabilities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Unknown module '{module}'")]
    UnknownModule { module: String },

    #[error("Module '{module}' is available in revision '{available}', requested '{requested}'")]
    IncompatibleRevision {
        module: String,
        requested: String,
        available: String,
    },

    #[error("Module '{module}' does not declare feature '{feature}'")]
    UnknownFeature { module: String, feature: String },

    #[error("Deviation module '{module}' could not be found")]
    MissingDeviation { module: String },

    #[error("Deviation target '{target}' in module '{module}' does not exist")]
    DeviationTarget { module: String, target: String },

    #[error("Augment target '{target}' in module '{module}' does not exist")]
    AugmentTarget { module: String, target: String },

    #[error("Invalid model definition for '{module}': {message}")]
    InvalidDefinition { module: String, message: String },
}

// Convenience methods for creating common errors
impl YangError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an illegal state error
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    /// The path sub-code, if this is a path error.
    pub fn path_code(&self) -> Option<PathErrorCode> {
        match self {
            Self::Path(e) => Some(e.code),
            _ => None,
        }
    }
}

// Result type aliases for convenience
pub type YangResult<T> = Result<T, YangError>;
pub type PathResult<T> = Result<T, PathError>;
pub type SchemaResult<T> = Result<T, SchemaValidationError>;
