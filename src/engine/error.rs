use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Missing browser object: {0}")]
    MissingBrowserObject(&'static str),
    #[error("Failed to acquire {0} context")]
    Context(&'static str),
    #[error("Shader compilation failed: {0}")]
    ShaderCompile(String),
    #[error("Program link failed: {0}")]
    ProgramLink(String),
    #[error("Failed to get {0} location")]
    MissingUniform(&'static str),
    #[error("Failed to create buffer")]
    BufferCreation,
    #[error("Failed to create texture")]
    TextureCreation,
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for EngineError {
    fn from(value: JsValue) -> Self {
        EngineError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<EngineError> for JsValue {
    fn from(error: EngineError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
