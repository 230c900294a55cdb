use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of the request array `POST /` always carries (spec.md §4.6).
/// `id` is `serde_json::Value` rather than narrowed to `String` so both
/// integer and string ids round-trip, per spec.md §4.6/§6.
#[derive(Debug, Clone, Deserialize)]
pub struct JrpcRequest {
    pub id: Value,
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// One element of the response array, mirroring `JrpcRequest`'s id/jsonrpc
/// framing. Exactly one of `result`/`error` is populated.
#[derive(Debug, Clone, Serialize)]
pub struct JrpcResponse {
    pub id: Value,
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JrpcError>,
}

impl JrpcResponse {
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Value, error: JrpcError) -> Self {
        Self {
            id,
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JrpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JrpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Error code catalog, spec.md §6.
pub mod codes {
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const NOT_IMPLEMENTED: i32 = -32701;
    pub const UNAUTHORIZED: i32 = -32800;
    pub const RATE_LIMITED: i32 = -32900;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response_omits_error_field() {
        let resp = JrpcResponse::ok(Value::from(1), Value::from("hi"));
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["result"], Value::from("hi"));
    }

    #[test]
    fn err_response_omits_result_field() {
        let resp = JrpcResponse::err(Value::from("1"), JrpcError::new(codes::METHOD_NOT_FOUND, "Method not found"));
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("result").is_none());
        assert_eq!(json["error"]["code"], -32601);
    }
}
