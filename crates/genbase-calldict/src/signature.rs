//! Parameter schemas and argument binding.

use std::collections::HashSet;

use genbase_export::Value;
use indexmap::IndexMap;
use thiserror::Error;

/// Reserved parameter name through which a captured callable receives its
/// [`CallRecord`](crate::CallRecord).
pub const CALL_RECORD_PARAM: &str = "__call_dict__";

/// Name of the receiver parameter of method signatures.
pub const RECEIVER_PARAM: &str = "self";

/// Parameter kinds, in the order they must be declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParamKind {
    PositionalOrKeyword,
    /// Catch-all for surplus positional arguments, bound as a tuple.
    VarPositional,
    KeywordOnly,
    /// Catch-all for surplus keyword arguments, bound as a mapping.
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    kind: ParamKind,
    default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::PositionalOrKeyword, None)
    }

    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::with_kind(name, ParamKind::PositionalOrKeyword, Some(default.into()))
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::KeywordOnly, None)
    }

    pub fn keyword_only_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::with_kind(name, ParamKind::KeywordOnly, Some(default.into()))
    }

    pub fn var_positional(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::VarPositional, None)
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::VarKeyword, None)
    }

    /// Keyword-only slot for the call record.
    pub fn call_record() -> Self {
        Self::keyword_only_default(CALL_RECORD_PARAM, Value::Null)
    }

    fn with_kind(name: impl Into<String>, kind: ParamKind, default: Option<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
            && matches!(
                self.kind,
                ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly
            )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("{callable}(): duplicate parameter `{name}`")]
    Duplicate { callable: String, name: String },
    #[error("{callable}(): parameter `{name}` is declared out of order")]
    OutOfOrder { callable: String, name: String },
    #[error("{callable}(): parameter `{name}` without a default follows one with a default")]
    NonDefaultAfterDefault { callable: String, name: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("{callable}() takes {expected} positional arguments but {given} were given")]
    TooManyPositional {
        callable: String,
        expected: usize,
        given: usize,
    },
    #[error("{callable}() got an unexpected keyword argument `{name}`")]
    UnexpectedKeyword { callable: String, name: String },
    #[error("{callable}() got multiple values for argument `{name}`")]
    MultipleValues { callable: String, name: String },
    #[error("{callable}() missing required argument `{name}`")]
    MissingArgument { callable: String, name: String },
    #[error("{callable}() is a method and was called without a receiver")]
    MissingReceiver { callable: String },
    #[error("{callable}(): `{name}` is reserved for the call record")]
    ReservedArgument { callable: String, name: String },
    #[error("{callable}(): receiver must be an object, got `{type_name}`")]
    InvalidReceiver { callable: String, type_name: String },
}

/// Static description of a callable's parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    name: String,
    params: Vec<Param>,
    method: bool,
}

impl Signature {
    pub fn function<I>(name: impl Into<String>, params: I) -> Result<Self, SignatureError>
    where
        I: IntoIterator<Item = Param>,
    {
        Self::build(name.into(), params.into_iter().collect(), false)
    }

    /// A method signature: a required `self` receiver precedes `params`.
    pub fn method<I>(name: impl Into<String>, params: I) -> Result<Self, SignatureError>
    where
        I: IntoIterator<Item = Param>,
    {
        let params = std::iter::once(Param::required(RECEIVER_PARAM))
            .chain(params)
            .collect();
        Self::build(name.into(), params, true)
    }

    fn build(name: String, params: Vec<Param>, method: bool) -> Result<Self, SignatureError> {
        let mut seen = HashSet::new();
        let mut previous: Option<ParamKind> = None;
        let mut saw_default = false;
        for param in &params {
            if !seen.insert(param.name.as_str()) {
                return Err(SignatureError::Duplicate {
                    callable: name,
                    name: param.name.clone(),
                });
            }
            if let Some(prev) = previous {
                let repeated_catch_all = prev == param.kind
                    && matches!(param.kind, ParamKind::VarPositional | ParamKind::VarKeyword);
                if param.kind < prev || repeated_catch_all {
                    return Err(SignatureError::OutOfOrder {
                        callable: name,
                        name: param.name.clone(),
                    });
                }
            }
            if param.kind == ParamKind::PositionalOrKeyword {
                if param.default.is_some() {
                    saw_default = true;
                } else if saw_default {
                    return Err(SignatureError::NonDefaultAfterDefault {
                        callable: name,
                        name: param.name.clone(),
                    });
                }
            }
            previous = Some(param.kind);
        }
        Ok(Self {
            name,
            params,
            method,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn is_method(&self) -> bool {
        self.method
    }

    pub fn has_var_keyword(&self) -> bool {
        self.params.iter().any(|p| p.kind == ParamKind::VarKeyword)
    }

    /// Whether the callable can receive a call record: it declares a
    /// keyword catch-all or the reserved parameter.
    pub fn accepts_call_record(&self) -> bool {
        self.has_var_keyword() || self.params.iter().any(|p| p.name == CALL_RECORD_PARAM)
    }

    /// Matches actual arguments to the declared parameters, filling in
    /// defaults. Catch-alls bind as a [`Value::Tuple`] / [`Value::Map`],
    /// empty when nothing is left over.
    pub fn bind(
        &self,
        args: Vec<Value>,
        mut kwargs: IndexMap<String, Value>,
    ) -> Result<BoundArguments, BindingError> {
        if kwargs.contains_key(CALL_RECORD_PARAM) {
            return Err(self.reserved());
        }
        let capacity = self
            .params
            .iter()
            .filter(|p| p.kind == ParamKind::PositionalOrKeyword)
            .count();
        let has_var_positional = self
            .params
            .iter()
            .any(|p| p.kind == ParamKind::VarPositional);
        if !has_var_positional && args.len() > capacity {
            return Err(BindingError::TooManyPositional {
                callable: self.name.clone(),
                expected: capacity,
                given: args.len(),
            });
        }

        let mut positional = args.into_iter();
        let mut arguments = IndexMap::with_capacity(self.params.len());
        for (index, param) in self.params.iter().enumerate() {
            let value = match param.kind {
                ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly
                    if param.name == CALL_RECORD_PARAM =>
                {
                    if param.kind == ParamKind::PositionalOrKeyword && positional.next().is_some() {
                        return Err(self.reserved());
                    }
                    continue;
                }
                ParamKind::PositionalOrKeyword => match positional.next() {
                    Some(value) => {
                        if kwargs.contains_key(&param.name) {
                            return Err(BindingError::MultipleValues {
                                callable: self.name.clone(),
                                name: param.name.clone(),
                            });
                        }
                        value
                    }
                    None => self.keyword_or_default(index, param, &mut kwargs)?,
                },
                ParamKind::KeywordOnly => self.keyword_or_default(index, param, &mut kwargs)?,
                ParamKind::VarPositional => Value::Tuple(positional.by_ref().collect()),
                ParamKind::VarKeyword => Value::Map(std::mem::take(&mut kwargs)),
            };
            arguments.insert(param.name.clone(), value);
        }

        if let Some(name) = kwargs.keys().next() {
            return Err(BindingError::UnexpectedKeyword {
                callable: self.name.clone(),
                name: name.clone(),
            });
        }
        Ok(BoundArguments { arguments })
    }

    fn keyword_or_default(
        &self,
        index: usize,
        param: &Param,
        kwargs: &mut IndexMap<String, Value>,
    ) -> Result<Value, BindingError> {
        if let Some(value) = kwargs.shift_remove(&param.name) {
            return Ok(value);
        }
        if let Some(default) = &param.default {
            return Ok(default.clone());
        }
        if self.method && index == 0 {
            return Err(BindingError::MissingReceiver {
                callable: self.name.clone(),
            });
        }
        Err(BindingError::MissingArgument {
            callable: self.name.clone(),
            name: param.name.clone(),
        })
    }

    fn reserved(&self) -> BindingError {
        BindingError::ReservedArgument {
            callable: self.name.clone(),
            name: CALL_RECORD_PARAM.to_owned(),
        }
    }
}

/// Arguments resolved against a [`Signature`], one entry per declared
/// parameter in declaration order. The reserved [`CALL_RECORD_PARAM`]
/// parameter has no entry; the record travels separately.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    arguments: IndexMap<String, Value>,
}

impl BoundArguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    pub fn receiver(&self) -> Option<&Value> {
        self.get(RECEIVER_PARAM)
    }

    pub fn arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }

    pub fn into_arguments(self) -> IndexMap<String, Value> {
        self.arguments
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.arguments.iter()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}
