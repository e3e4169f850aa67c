//! Wire types for the `financas/caixa` endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::models::ReportedCategory;

/// Request envelope: `{call, param: [{nAno, nMes}], app_key, app_secret}`
#[derive(Debug, Clone, Serialize)]
pub struct ListBudgetsRequest<'a> {
    pub call: &'a str,
    pub param: [PeriodParam; 1],
    pub app_key: &'a str,
    pub app_secret: &'a str,
}

/// Month selector inside `param`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodParam {
    #[serde(rename = "nAno")]
    pub year: i32,
    #[serde(rename = "nMes")]
    pub month: u32,
}

/// Response body; a fault replaces the listing when the vendor rejects
/// the call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBudgetsResponse {
    #[serde(rename = "ListaOrcamentos", default)]
    pub entries: Option<Vec<ReportedCategory>>,

    #[serde(default)]
    pub faultcode: Option<String>,

    #[serde(default)]
    pub faultstring: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = ListBudgetsRequest {
            call: "ListarOrcamentos",
            param: [PeriodParam {
                year: 2024,
                month: 5,
            }],
            app_key: "key",
            app_secret: "secret",
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "call": "ListarOrcamentos",
                "param": [{"nAno": 2024, "nMes": 5}],
                "app_key": "key",
                "app_secret": "secret"
            })
        );
    }

    #[test]
    fn test_fault_response() {
        let response: ListBudgetsResponse = serde_json::from_value(json!({
            "faultstring": "ERROR: Consumo redundante detectado",
            "faultcode": "SOAP-ENV:Client-8020"
        }))
        .unwrap();

        assert!(response.entries.is_none());
        assert_eq!(response.faultcode.as_deref(), Some("SOAP-ENV:Client-8020"));
    }

    #[test]
    fn test_listing_response() {
        let response: ListBudgetsResponse = serde_json::from_value(json!({
            "ListaOrcamentos": [
                {"cCodCateg": "1.01", "cDesCateg": "Vendas", "nValorPrevisto": 10.0, "nValorRealizado": 7.5}
            ]
        }))
        .unwrap();

        let entries = response.entries.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category.as_deref(), Some("Vendas"));
        assert!(response.faultcode.is_none());
    }
}
