//! Core types for the Alfabank REST gateway

use crate::messages::{Language, MessageKind};
use crate::{AlfabankError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name of the response field that signals a gateway-side failure
pub const ERROR_CODE_FIELD: &str = "errorCode";

/// Name of the response field carrying the gateway's error description
pub const ERROR_MESSAGE_FIELD: &str = "errorMessage";

/// Wire names of the credential parameters
pub mod fields {
    pub const TOKEN: &str = "token";
    pub const USER_NAME: &str = "userName";
    pub const PASSWORD: &str = "password";
}

/// Operations understood by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RegisterPreAuth,
    Register,
    GetOrderStatusExtended,
    GetLastOrdersForMerchants,
    GetBindingsByCardOrId,
    GetBindings,
    GetOrderStatus,
    VerifyEnrollment,
    PaymentOrderBinding,
    Reverse,
    PaymentOtherWay,
    Deposit,
    AddParams,
    UnBindCard,
    Refund,
    BindCard,
}

impl Operation {
    /// Every operation in the gateway's allow-list
    pub const ALL: [Operation; 16] = [
        Operation::RegisterPreAuth,
        Operation::Register,
        Operation::GetOrderStatusExtended,
        Operation::GetLastOrdersForMerchants,
        Operation::GetBindingsByCardOrId,
        Operation::GetBindings,
        Operation::GetOrderStatus,
        Operation::VerifyEnrollment,
        Operation::PaymentOrderBinding,
        Operation::Reverse,
        Operation::PaymentOtherWay,
        Operation::Deposit,
        Operation::AddParams,
        Operation::UnBindCard,
        Operation::Refund,
        Operation::BindCard,
    ];

    /// Name of the operation as it appears in the request path
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::RegisterPreAuth => "registerPreAuth",
            Operation::Register => "register",
            Operation::GetOrderStatusExtended => "getOrderStatusExtended",
            Operation::GetLastOrdersForMerchants => "getLastOrdersForMerchants",
            Operation::GetBindingsByCardOrId => "getBindingsByCardOrId",
            Operation::GetBindings => "getBindings",
            Operation::GetOrderStatus => "getOrderStatus",
            Operation::VerifyEnrollment => "verifyEnrollment",
            Operation::PaymentOrderBinding => "paymentOrderBinding",
            Operation::Reverse => "reverse",
            Operation::PaymentOtherWay => "paymentotherway",
            Operation::Deposit => "deposit",
            Operation::AddParams => "addParams",
            Operation::UnBindCard => "unBindCard",
            Operation::Refund => "refund",
            Operation::BindCard => "bindCard",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name is not in the operation allow-list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|operation| operation.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Scalar value of a request parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Bool(bool),
}

impl ParamValue {
    /// Whether the value is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ParamValue::Integer(_) | ParamValue::Float(_) | ParamValue::Decimal(_)
        )
    }

    /// Whether the value counts as missing (an empty or whitespace-only string)
    pub fn is_blank(&self) -> bool {
        matches!(self, ParamValue::String(s) if s.trim().is_empty())
    }

    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(ParamValue::Bool(b)),
            Value::String(s) => Some(ParamValue::String(s)),
            Value::Number(n) => {
                let param = if let Some(i) = n.as_i64() {
                    ParamValue::Integer(i)
                } else if n.is_f64() {
                    ParamValue::Float(n.as_f64()?)
                } else {
                    ParamValue::String(n.to_string())
                };
                Some(param)
            }
            // serde_json also renders non-finite floats as null
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Integer(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Decimal(d) => write!(f, "{d}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::String(value.clone())
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(ParamValue::Integer)
            .unwrap_or_else(|_| ParamValue::String(value.to_string()))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        ParamValue::Decimal(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Flat key/value arguments of a gateway call
pub type Parameters = BTreeMap<String, ParamValue>;

/// Convert any serializable value into flat [`Parameters`]
///
/// The value must serialize to a JSON object whose values are scalars.
/// Anything else, `null` values included, fails with the localized
/// `params_invalid` message. Optional fields should be skipped with
/// `#[serde(skip_serializing_if = "Option::is_none")]`.
pub fn to_parameters<P: Serialize>(params: P, language: Language) -> Result<Parameters> {
    let invalid = || AlfabankError::validation(MessageKind::ParamsInvalid, language);

    let map = match serde_json::to_value(params) {
        Ok(Value::Object(map)) => map,
        _ => return Err(invalid()),
    };

    let mut parameters = Parameters::new();
    for (key, value) in map {
        let param = ParamValue::from_json(value).ok_or_else(invalid)?;
        parameters.insert(key, param);
    }
    Ok(parameters)
}

/// Parsed JSON object returned by the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayResponse(Map<String, Value>);

impl GatewayResponse {
    /// Wrap a parsed response object
    pub fn new(body: Map<String, Value>) -> Self {
        Self(body)
    }

    /// Raw `errorCode` field, if present
    pub fn error_code(&self) -> Option<&Value> {
        self.0.get(ERROR_CODE_FIELD)
    }

    /// Whether the gateway reported a failure
    ///
    /// `false`, `null`, `0`, `""` and `"0"` mean "no error"; every other value
    /// of `errorCode` marks the call as failed.
    pub fn has_error(&self) -> bool {
        self.error_code().is_some_and(is_truthy_code)
    }

    /// `errorCode` rendered for display
    pub fn error_code_display(&self) -> String {
        match self.error_code() {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "none".to_string(),
        }
    }

    /// Human-readable error description, if the gateway supplied one
    pub fn error_message(&self) -> Option<&str> {
        self.0.get(ERROR_MESSAGE_FIELD).and_then(Value::as_str)
    }

    /// Look up a response field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the whole response object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the response object
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Take the response as a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for GatewayResponse {
    type Error = AlfabankError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AlfabankError::invalid_response(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }
}

fn is_truthy_code(code: &Value) -> bool {
    match code {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Authentication attached to every request
///
/// A token, a username/password pair, or both. Empty strings count as absent.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl Credentials {
    /// Token-based credentials
    pub fn token(token: impl Into<String>) -> Self {
        Self::default().with_token(token)
    }

    /// Username/password credentials
    pub fn login(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self::default().with_login(user_name, password)
    }

    /// Set the token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = non_empty(token.into());
        self
    }

    /// Set the username/password pair
    pub fn with_login(mut self, user_name: impl Into<String>, password: impl Into<String>) -> Self {
        self.user_name = non_empty(user_name.into());
        self.password = non_empty(password.into());
        self
    }

    /// Whether a token is configured
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Whether a complete username/password pair is configured
    pub fn has_login(&self) -> bool {
        self.user_name.is_some() && self.password.is_some()
    }

    /// Whether at least one authentication mode is usable
    pub fn is_complete(&self) -> bool {
        self.has_token() || self.has_login()
    }

    /// Configured username, if any
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Merge the configured credential fields into a parameter map
    pub fn apply(&self, params: &mut Parameters) {
        if let Some(token) = &self.token {
            params.insert(fields::TOKEN.to_string(), ParamValue::from(token));
        }
        if let (Some(user_name), Some(password)) = (&self.user_name, &self.password) {
            params.insert(fields::USER_NAME.to_string(), ParamValue::from(user_name));
            params.insert(fields::PASSWORD.to_string(), ParamValue::from(password));
        }
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            token: self.token.and_then(non_empty),
            user_name: self.user_name.and_then(non_empty),
            password: self.password.and_then(non_empty),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |present: bool| if present { "<redacted>" } else { "<none>" };
        f.debug_struct("Credentials")
            .field("token", &redact(self.token.is_some()))
            .field("user_name", &self.user_name)
            .field("password", &redact(self.password.is_some()))
            .finish()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_operation_round_trips_every_name() {
        for operation in Operation::ALL {
            assert_eq!(operation.as_str().parse::<Operation>().unwrap(), operation);
        }
        assert_eq!("paymentotherway".parse::<Operation>().unwrap(), Operation::PaymentOtherWay);
    }

    #[test]
    fn test_operation_names_are_case_sensitive() {
        assert!("Register".parse::<Operation>().is_err());
        assert!("paymentOtherWay".parse::<Operation>().is_err());
        assert_eq!(
            "getStatus".parse::<Operation>().unwrap_err(),
            UnknownOperation("getStatus".to_string())
        );
    }

    #[test]
    fn test_to_parameters_accepts_flat_objects() {
        let params = to_parameters(
            json!({"orderId": "ORD1", "amount": 100, "ratio": 0.5, "flag": true}),
            Language::En,
        )
        .unwrap();

        assert_eq!(params.len(), 4);
        assert_eq!(params["orderId"], ParamValue::from("ORD1"));
        assert_eq!(params["amount"], ParamValue::Integer(100));
        assert_eq!(params["ratio"], ParamValue::Float(0.5));
        assert_eq!(params["flag"], ParamValue::Bool(true));
    }

    #[test]
    fn test_to_parameters_rejects_null_and_non_finite_values() {
        #[derive(Serialize)]
        struct Refund {
            amount: f64,
            order_id: &'static str,
        }

        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let error = to_parameters(
                Refund {
                    amount,
                    order_id: "A",
                },
                Language::En,
            )
            .unwrap_err();
            assert_eq!(error.message_kind(), Some(MessageKind::ParamsInvalid));
        }

        let error = to_parameters(json!({"orderId": "ORD1", "skip": null}), Language::En)
            .unwrap_err();
        assert_eq!(error.message_kind(), Some(MessageKind::ParamsInvalid));

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Status {
            order_id: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            language: Option<&'static str>,
        }
        let params = to_parameters(
            Status {
                order_id: "ORD1",
                language: None,
            },
            Language::En,
        )
        .unwrap();
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_to_parameters_accepts_maps_and_structs() {
        let mut map = HashMap::new();
        map.insert("orderId", "ORD1");
        assert_eq!(to_parameters(&map, Language::En).unwrap().len(), 1);

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Status {
            order_id: String,
        }
        let params = to_parameters(
            Status {
                order_id: "ORD2".to_string(),
            },
            Language::En,
        )
        .unwrap();
        assert_eq!(params["orderId"], ParamValue::from("ORD2"));
    }

    #[test]
    fn test_to_parameters_rejects_non_objects() {
        for params in [
            json!(["orderId", "ORD1"]),
            json!([]),
            json!("orderId=ORD1"),
            json!(42),
            json!(null),
            json!({"nested": {"a": 1}}),
            json!({"list": [1, 2]}),
        ] {
            let error = to_parameters(&params, Language::Ru).unwrap_err();
            assert_eq!(error.message_kind(), Some(MessageKind::ParamsInvalid), "{params}");
            assert_eq!(
                error.to_string(),
                MessageKind::ParamsInvalid.text(Language::Ru)
            );
        }
    }

    #[test]
    fn test_error_code_truthiness() {
        let response = |body: Value| GatewayResponse::try_from(body).unwrap();

        assert!(!response(json!({"orderId": "1"})).has_error());
        assert!(!response(json!({"errorCode": 0})).has_error());
        assert!(!response(json!({"errorCode": "0"})).has_error());
        assert!(!response(json!({"errorCode": ""})).has_error());
        assert!(!response(json!({"errorCode": null})).has_error());
        assert!(!response(json!({"errorCode": false})).has_error());

        assert!(response(json!({"errorCode": 5})).has_error());
        assert!(response(json!({"errorCode": "7"})).has_error());
        assert!(response(json!({"errorCode": true})).has_error());
    }

    #[test]
    fn test_gateway_response_requires_object() {
        assert!(GatewayResponse::try_from(json!([1, 2])).is_err());
        assert!(GatewayResponse::try_from(json!("ok")).is_err());

        let response =
            GatewayResponse::try_from(json!({"errorCode": "2", "errorMessage": "Order declined"}))
                .unwrap();
        assert_eq!(response.error_message(), Some("Order declined"));
        assert_eq!(response.error_code_display(), "2");
        assert_eq!(
            response.into_value(),
            json!({"errorCode": "2", "errorMessage": "Order declined"})
        );
    }

    #[test]
    fn test_credentials_apply() {
        let mut params = Parameters::new();
        Credentials::token("secret").apply(&mut params);
        assert_eq!(params.len(), 1);
        assert_eq!(params[fields::TOKEN], ParamValue::from("secret"));

        let mut params = Parameters::new();
        Credentials::login("merchant-api", "pass").apply(&mut params);
        assert_eq!(params.len(), 2);
        assert_eq!(params[fields::USER_NAME], ParamValue::from("merchant-api"));
        assert_eq!(params[fields::PASSWORD], ParamValue::from("pass"));

        let mut params = Parameters::new();
        Credentials::token("secret")
            .with_login("merchant-api", "pass")
            .apply(&mut params);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_credentials_completeness() {
        assert!(!Credentials::default().is_complete());
        assert!(!Credentials::token("").is_complete());
        assert!(!Credentials::login("merchant-api", "").is_complete());
        assert!(Credentials::token("secret").is_complete());
        assert!(Credentials::login("merchant-api", "pass").is_complete());
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let debug = format!("{:?}", Credentials::token("secret").with_login("merchant-api", "pass"));
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("pass\""));
        assert!(debug.contains("merchant-api"));
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::from(5.005).to_string(), "5.005");
        assert_eq!(ParamValue::from(1999_i64).to_string(), "1999");
        assert_eq!(ParamValue::from(true).to_string(), "true");
        assert_eq!(ParamValue::from(u64::MAX), ParamValue::String(u64::MAX.to_string()));
    }
}
