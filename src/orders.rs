//! Convenience methods for the common order operations
//!
//! Each operation has a synchronous `*_params` half that validates arguments
//! and builds the request parameters, and an async half that sends them.
//! Argument errors are therefore raised before any request is made.

use crate::client::AlfabankClient;
use crate::messages::MessageKind;
use crate::types::{GatewayResponse, Operation, ParamValue, Parameters};
use crate::{AlfabankError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Wire names of the order parameters
pub mod fields {
    pub const ORDER_NUMBER: &str = "orderNumber";
    pub const ORDER_ID: &str = "orderId";
    pub const AMOUNT: &str = "amount";
    pub const DESCRIPTION: &str = "description";
    pub const RETURN_URL: &str = "returnUrl";
    pub const FAIL_URL: &str = "failUrl";
}

/// Convert an amount in currency units to integer minor units
///
/// The amount is taken at its shortest decimal representation, multiplied by
/// 100 and rounded half away from zero, so `5.005` becomes `501` even though
/// the nearest `f64` is slightly below `5.005`. Returns `None` for
/// non-numeric, non-finite or out-of-range amounts. The API methods report
/// the first two as `value_type_invalid` and the last as `value_invalid`.
pub fn to_minor_units(amount: &ParamValue) -> Option<i64> {
    let amount = match amount {
        ParamValue::Integer(units) => return units.checked_mul(100),
        ParamValue::Float(x) if x.is_finite() => Decimal::from_str(&x.to_string()).ok()?,
        ParamValue::Decimal(d) => *d,
        _ => return None,
    };

    amount
        .checked_mul(Decimal::from(100))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

impl AlfabankClient {
    /// Build the parameters of a `register` call
    ///
    /// `fail_url` falls back to `return_url` when absent or blank.
    pub fn register_params(
        &self,
        order_number: impl Into<ParamValue>,
        amount: impl Into<ParamValue>,
        description: &str,
        return_url: &str,
        fail_url: Option<&str>,
    ) -> Result<Parameters> {
        let amount = self.minor_units(fields::AMOUNT, &amount.into())?;
        let order_number = self.required(fields::ORDER_NUMBER, order_number.into())?;
        let description = self.required(fields::DESCRIPTION, description.into())?;
        let return_url = self.required(fields::RETURN_URL, return_url.into())?;
        let fail_url = match fail_url {
            Some(url) if !url.trim().is_empty() => ParamValue::from(url),
            _ => return_url.clone(),
        };

        let mut params = Parameters::new();
        params.insert(fields::ORDER_NUMBER.to_string(), order_number);
        params.insert(fields::AMOUNT.to_string(), ParamValue::Integer(amount));
        params.insert(fields::DESCRIPTION.to_string(), description);
        params.insert(fields::RETURN_URL.to_string(), return_url);
        params.insert(fields::FAIL_URL.to_string(), fail_url);
        Ok(params)
    }

    /// Register a new order
    pub async fn register(
        &self,
        order_number: impl Into<ParamValue>,
        amount: impl Into<ParamValue>,
        description: &str,
        return_url: &str,
        fail_url: Option<&str>,
    ) -> Result<GatewayResponse> {
        let params =
            self.register_params(order_number, amount, description, return_url, fail_url)?;
        self.dispatch(Operation::Register, params).await
    }

    /// Build the parameters of a `getOrderStatus` call
    pub fn get_order_status_params(&self, order_id: &str) -> Result<Parameters> {
        self.order_params(order_id)
    }

    /// Query the status of an order
    pub async fn get_order_status(&self, order_id: &str) -> Result<GatewayResponse> {
        let params = self.get_order_status_params(order_id)?;
        self.dispatch(Operation::GetOrderStatus, params).await
    }

    /// Build the parameters of a `refund` call
    pub fn refund_params(&self, order_id: &str, amount: impl Into<ParamValue>) -> Result<Parameters> {
        self.order_amount_params(order_id, amount.into())
    }

    /// Refund a paid order, fully or partially
    pub async fn refund(
        &self,
        order_id: &str,
        amount: impl Into<ParamValue>,
    ) -> Result<GatewayResponse> {
        let params = self.refund_params(order_id, amount)?;
        self.dispatch(Operation::Refund, params).await
    }

    /// Build the parameters of a `reverse` call
    pub fn reverse_params(&self, order_id: &str) -> Result<Parameters> {
        self.order_params(order_id)
    }

    /// Cancel an order before it is settled
    pub async fn reverse(&self, order_id: &str) -> Result<GatewayResponse> {
        let params = self.reverse_params(order_id)?;
        self.dispatch(Operation::Reverse, params).await
    }

    /// Build the parameters of a `deposit` call
    pub fn deposit_params(&self, order_id: &str, amount: impl Into<ParamValue>) -> Result<Parameters> {
        self.order_amount_params(order_id, amount.into())
    }

    /// Complete a pre-authorized order
    ///
    /// An amount of zero asks the gateway to charge the full pre-authorized sum.
    pub async fn deposit(
        &self,
        order_id: &str,
        amount: impl Into<ParamValue>,
    ) -> Result<GatewayResponse> {
        let params = self.deposit_params(order_id, amount)?;
        self.dispatch(Operation::Deposit, params).await
    }

    fn order_params(&self, order_id: &str) -> Result<Parameters> {
        let order_id = self.required(fields::ORDER_ID, order_id.into())?;

        let mut params = Parameters::new();
        params.insert(fields::ORDER_ID.to_string(), order_id);
        Ok(params)
    }

    fn order_amount_params(&self, order_id: &str, amount: ParamValue) -> Result<Parameters> {
        let amount = self.minor_units(fields::AMOUNT, &amount)?;
        let mut params = self.order_params(order_id)?;
        params.insert(fields::AMOUNT.to_string(), ParamValue::Integer(amount));
        Ok(params)
    }

    fn required(&self, field: &str, value: ParamValue) -> Result<ParamValue> {
        if value.is_blank() {
            return Err(AlfabankError::invalid_argument(
                MessageKind::ValueInvalid,
                self.language(),
                field,
            ));
        }
        Ok(value)
    }

    fn minor_units(&self, field: &str, amount: &ParamValue) -> Result<i64> {
        let finite = match amount {
            ParamValue::Float(x) => x.is_finite(),
            other => other.is_numeric(),
        };
        let kind = if finite {
            MessageKind::ValueInvalid
        } else {
            MessageKind::ValueTypeInvalid
        };
        to_minor_units(amount)
            .ok_or_else(|| AlfabankError::invalid_argument(kind, self.language(), field))
    }
}
