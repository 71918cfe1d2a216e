//! Scheduling operations packaged as callable tools for agent
//! frameworks: a JSON-schema function description, the permission the
//! tool needs, and a `call` entry point taking JSON arguments.

pub mod api;
pub mod catalog;

pub use api::{AppointyApi, AppointyTool, toolkit};
pub use catalog::{Method, ToolDefinition, catalog};

use std::collections::BTreeMap;

use anyhow::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct Items {
    pub r#type: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Property {
    pub r#type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
}

impl Property {
    pub fn string(description: &str) -> Self {
        Self {
            r#type: String::from("string"),
            description: description.to_string(),
            items: None,
        }
    }

    pub fn string_list(description: &str) -> Self {
        Self {
            r#type: String::from("array"),
            description: description.to_string(),
            items: Some(Items {
                r#type: String::from("string"),
            }),
        }
    }
}

pub type Properties = BTreeMap<String, Property>;

#[derive(Clone, Debug, Serialize)]
pub struct Parameters<Props: Serialize> {
    pub r#type: String,
    pub properties: Props,
    pub required: Vec<String>,
    #[serde(rename = "additionalProperties")]
    pub additional_properties: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct Function<Props: Serialize> {
    pub name: String,
    pub description: String,
    pub parameters: Parameters<Props>,
    pub strict: bool,
}

#[derive(Clone, Debug, Serialize)]
pub enum ToolType {
    #[serde(rename = "function")]
    Function,
}

// `serde::Serialize` isn't object safe, so tools are serialized through
// `erased_serde` to allow a `Vec` of boxed trait objects to be handed
// straight to `serde_json`.
#[async_trait]
pub trait ToolCall: erased_serde::Serialize {
    async fn call(&self, args: &str) -> Result<String, Error>;
    fn function_name(&self) -> String;
}
erased_serde::serialize_trait_object!(ToolCall);

pub type BoxedToolCall = Box<dyn ToolCall + Send + Sync + 'static>;
