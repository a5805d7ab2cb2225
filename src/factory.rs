// Request body factory for the booking lifecycle. Builds well-formed default
// payloads for each step; callers override individual top-level fields.
// Light schema awareness: when the rates request schema carries a currency
// enum, its first entry wins over the built-in default.

use serde_json::{json, Map, Value};

use crate::openapi::{Method, SchemaSource};

#[derive(Debug, Clone, Default)]
pub struct RequestFactory {
    run_id: String,
    schemas: SchemaSource,
}

impl RequestFactory {
    pub fn new(run_id: impl Into<String>, schemas: SchemaSource) -> Self {
        Self {
            run_id: run_id.into(),
            schemas,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn dates(&self) -> (String, String) {
        ("2025-12-30".to_string(), "2025-12-31".to_string())
    }

    pub fn occupancy_adults2(&self) -> Value {
        json!([{ "adults": 2 }])
    }

    pub fn holder(&self) -> Value {
        json!({
            "firstName": "Steve",
            "lastName": "Doe",
            "email": format!("s.doe+{}@example.travel", self.run_id),
        })
    }

    pub fn guest(&self, occupancy: u32) -> Value {
        json!({
            "occupancyNumber": occupancy,
            "remarks": "quiet room please",
            "firstName": "Sunny",
            "lastName": "Mars",
            "email": format!("s.mars+{}@example.travel", self.run_id),
        })
    }

    // Body for POST /hotels/rates
    pub fn rates_body(&self, hotel_ids: &[String], overrides: Value) -> Value {
        let (checkin, checkout) = self.dates();
        let mut base = json!({
            "hotelIds": hotel_ids,
            "occupancies": self.occupancy_adults2(),
            "currency": "USD",
            "guestNationality": "US",
            "checkin": checkin,
            "checkout": checkout,
            "timeout": 5,
            "roomMapping": true,
        });

        // Prefer a schema-declared currency enum when one exists
        if let Some(currency) = self.schema_currency() {
            base["currency"] = Value::String(currency);
        }

        merge_overrides(base, overrides)
    }

    // Body for POST /rates/prebook
    pub fn prebook_body(&self, offer_id: &str, overrides: Value) -> Value {
        let base = json!({
            "offerId": offer_id,
            "usePaymentSdk": false,
        });
        merge_overrides(base, overrides)
    }

    // Body for POST /rates/book
    pub fn book_body(&self, prebook_id: &str, overrides: Value) -> Value {
        let base = json!({
            "prebookId": prebook_id,
            "holder": self.holder(),
            "guests": [self.guest(1)],
            "payment": { "method": "ACC_CREDIT_CARD" },
        });
        merge_overrides(base, overrides)
    }

    fn schema_currency(&self) -> Option<String> {
        let schema = self.schemas.request_schema("/hotels/rates", Method::Post)?;
        let first = schema
            .get("properties")?
            .get("currency")?
            .get("enum")?
            .as_array()?
            .first()?;
        first.as_str().map(str::to_string)
    }
}

// Shallow merge: every top-level key in `overrides` replaces the default,
// matching how callers build variant payloads (occupancies, payment, ...).
fn merge_overrides(base: Value, overrides: Value) -> Value {
    let Value::Object(extra) = overrides else {
        return base;
    };
    let mut merged: Map<String, Value> = match base {
        Value::Object(map) => map,
        other => return other,
    };
    for (key, value) in extra {
        merged.insert(key, value);
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn factory() -> RequestFactory {
        RequestFactory::new("RUN-1700000000000-a1b2c3", SchemaSource::default())
    }

    #[test]
    fn rates_body_defaults() {
        let body = factory().rates_body(&["lp19ce8".into()], json!({}));
        assert_eq!(body["hotelIds"], json!(["lp19ce8"]));
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["guestNationality"], "US");
        assert_eq!(body["occupancies"], json!([{ "adults": 2 }]));
        assert_eq!(body["checkin"], "2025-12-30");
        assert_eq!(body["checkout"], "2025-12-31");
        assert_eq!(body["roomMapping"], true);
    }

    #[test]
    fn overrides_replace_only_named_fields() {
        let occ = json!([{ "adults": 2 }, { "adults": 2 }]);
        let body = factory().rates_body(
            &["lp1".into(), "lp2".into()],
            json!({ "occupancies": occ.clone(), "currency": "EUR" }),
        );
        assert_eq!(body["occupancies"], occ);
        assert_eq!(body["currency"], "EUR");
        // untouched defaults survive
        assert_eq!(body["guestNationality"], "US");
        assert_eq!(body["hotelIds"], json!(["lp1", "lp2"]));
    }

    #[test]
    fn schema_currency_enum_wins_over_default() {
        let spec = json!({
            "paths": { "/hotels/rates": { "post": {
                "requestBody": { "content": { "application/json": { "schema": {
                    "properties": { "currency": { "enum": ["EUR", "USD"] } }
                } } } }
            } } }
        });
        let f = RequestFactory::new("RUN-1-x", SchemaSource::from_value(spec));
        let body = f.rates_body(&["lp1".into()], json!({}));
        assert_eq!(body["currency"], "EUR");
    }

    #[test]
    fn book_body_carries_holder_guest_and_payment() {
        let body = factory().book_body("pb-123", json!({}));
        assert_eq!(body["prebookId"], "pb-123");
        assert_eq!(body["holder"]["firstName"], "Steve");
        assert_eq!(body["guests"][0]["occupancyNumber"], 1);
        assert_eq!(body["payment"]["method"], "ACC_CREDIT_CARD");
        let email = body["holder"]["email"].as_str().unwrap();
        assert!(email.contains("RUN-1700000000000-a1b2c3"));
    }

    #[test]
    fn prebook_body_disables_payment_sdk() {
        let body = factory().prebook_body("of-9", json!({ "usePaymentSdk": true }));
        assert_eq!(body["offerId"], "of-9");
        assert_eq!(body["usePaymentSdk"], true);
    }
}
