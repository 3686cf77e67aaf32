//! Typed response envelope.
//!
//! A response carries either a success code with data (tabular resultsets
//! or a hierarchical forest) or an error code with a detail. Exactly one
//! of the two is populated; the decoder keeps the closed shapes instead of
//! an open map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::message::MsgCode;
use crate::resultset::Resultset;

/// Success payload shapes, decided by the request variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespData {
    /// Tabular shape: zero or more resultsets.
    Rs(Vec<Resultset>),
    /// Hierarchical shape for tree-shaped data.
    Forest(Vec<TreeNode>),
    /// Session info returned by the session port.
    Ss(crate::message::SessionInfo),
}

/// Error payload of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: MsgCode,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorDetail {
    pub fn new(code: MsgCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            details: None,
        }
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }
}

/// One node of a forest response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn field(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }
}

/// Decoded server response: a code plus either data or an error detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub code: MsgCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RespData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl ResponseEnvelope {
    /// Success response carrying resultsets.
    pub fn ok_rs(rs: Vec<Resultset>) -> Self {
        Self {
            code: MsgCode::Ok,
            data: Some(RespData::Rs(rs)),
            error: None,
        }
    }

    /// Success response with no rows, e.g. after an update chain.
    pub fn ok_empty() -> Self {
        Self::ok_rs(Vec::new())
    }

    /// Success response carrying a forest.
    pub fn ok_forest(forest: Vec<TreeNode>) -> Self {
        Self {
            code: MsgCode::Ok,
            data: Some(RespData::Forest(forest)),
            error: None,
        }
    }

    /// Failure response.
    pub fn err(code: MsgCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            error: Some(ErrorDetail::new(code, msg)),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }

    /// All resultsets, empty when the payload is not tabular.
    pub fn rs_all(&self) -> &[Resultset] {
        match &self.data {
            Some(RespData::Rs(rs)) => rs,
            _ => &[],
        }
    }

    /// Resultset at `ix`, if the payload is tabular and deep enough.
    pub fn rs(&self, ix: usize) -> Option<&Resultset> {
        self.rs_all().get(ix)
    }

    /// The forest payload, empty when the payload is not hierarchical.
    pub fn forest(&self) -> &[TreeNode] {
        match &self.data {
            Some(RespData::Forest(f)) => f,
            _ => &[],
        }
    }
}
