//! Cloud Firestore over its REST API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Document, DocumentStore};
use crate::errors::AppError;

const FIRESTORE_API: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: &str = "300";

pub struct FirestoreStore {
    client: reqwest::Client,
    collection_url: String,
    api_key: String,
    id_token: Option<String>,
}

#[derive(Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

impl FirestoreStore {
    pub fn new(
        project_id: &str,
        collection: &str,
        api_key: String,
        id_token: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            collection_url: format!(
                "{FIRESTORE_API}/projects/{project_id}/databases/(default)/documents/{collection}"
            ),
            api_key,
            id_token,
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if !self.api_key.is_empty() {
            builder = builder.query(&[("key", &self.api_key)]);
        }
        if let Some(token) = &self.id_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }
}

fn unavailable(e: reqwest::Error) -> AppError {
    AppError::StoreUnavailable(e.to_string())
}

async fn check(response: Response, id: Option<&str>) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let missing = status == StatusCode::NOT_FOUND
        || (status == StatusCode::BAD_REQUEST && body.contains("FAILED_PRECONDITION"));
    match (missing, id) {
        (true, Some(id)) => Err(AppError::NotFound(format!("document {id}"))),
        _ => Err(AppError::StoreUnavailable(format!(
            "firestore returned {status}: {body}"
        ))),
    }
}

fn document_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

fn body_for(data: &Value) -> Result<Value, AppError> {
    let map = data.as_object().ok_or_else(|| {
        AppError::StoreUnavailable("firestore documents must be JSON objects".to_string())
    })?;
    Ok(serde_json::json!({ "fields": to_fields(map) }))
}

pub fn to_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), to_firestore_value(v)))
        .collect()
}

pub fn from_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), from_firestore_value(v)))
        .collect()
}

/// Plain JSON to a Firestore typed `Value`.
pub fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => serde_json::json!({ "nullValue": null }),
        Value::Bool(b) => serde_json::json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => serde_json::json!({ "integerValue": i.to_string() }),
            None => serde_json::json!({ "doubleValue": n }),
        },
        Value::String(s) => serde_json::json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(to_firestore_value).collect();
            serde_json::json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => serde_json::json!({ "mapValue": { "fields": to_fields(map) } }),
    }
}

/// A Firestore typed `Value` back to plain JSON. Unknown kinds become `null`.
pub fn from_firestore_value(value: &Value) -> Value {
    let Some(typed) = value.as_object() else {
        return Value::Null;
    };

    if let Some(v) = typed
        .get("stringValue")
        .or_else(|| typed.get("booleanValue"))
        .or_else(|| typed.get("doubleValue"))
        .or_else(|| typed.get("timestampValue"))
        .or_else(|| typed.get("referenceValue"))
    {
        return v.clone();
    }

    if let Some(v) = typed.get("integerValue") {
        return match v {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            other => other.clone(),
        };
    }

    if let Some(map) = typed.get("mapValue") {
        let fields = map
            .get("fields")
            .and_then(Value::as_object)
            .map(from_fields)
            .unwrap_or_default();
        return Value::Object(fields);
    }

    if let Some(array) = typed.get("arrayValue") {
        let values: Vec<Value> = array
            .get("values")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(from_firestore_value).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }

    Value::Null
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn list_all(&self) -> Result<Vec<Document>, AppError> {
        let mut documents = vec![];
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, &self.collection_url)
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = check(request.send().await.map_err(unavailable)?, None).await?;
            let page: ListResponse = response.json().await.map_err(unavailable)?;

            documents.extend(page.documents.into_iter().map(|doc| Document {
                id: document_id(&doc.name),
                data: Value::Object(from_fields(&doc.fields)),
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn add(&self, data: Value) -> Result<String, AppError> {
        let body = body_for(&data)?;
        let response = self
            .request(Method::POST, &self.collection_url)
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;
        let created: FirestoreDocument = check(response, None)
            .await?
            .json()
            .await
            .map_err(unavailable)?;
        Ok(document_id(&created.name))
    }

    async fn set(&self, id: &str, data: Value) -> Result<(), AppError> {
        let body = body_for(&data)?;
        let response = self
            .request(Method::PATCH, &self.document_url(id))
            .query(&[("currentDocument.exists", "true")])
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;
        check(response, Some(id)).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let response = self
            .request(Method::DELETE, &self.document_url(id))
            .query(&[("currentDocument.exists", "true")])
            .send()
            .await
            .map_err(unavailable)?;
        check(response, Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_document_to_fields() {
        let data = serde_json::json!({
            "customer_name": "Jane",
            "booking_time": {"start": "02:00 PM", "end": "03:00 PM"},
            "price": 50,
            "discount": 2.5,
        });
        let fields = to_fields(data.as_object().unwrap());

        assert_eq!(fields["customer_name"], serde_json::json!({"stringValue": "Jane"}));
        assert_eq!(fields["price"], serde_json::json!({"integerValue": "50"}));
        assert_eq!(fields["discount"], serde_json::json!({"doubleValue": 2.5}));
        assert_eq!(
            fields["booking_time"]["mapValue"]["fields"]["start"],
            serde_json::json!({"stringValue": "02:00 PM"})
        );
    }

    #[test]
    fn test_fields_back_to_json() {
        let fields = serde_json::json!({
            "customer_name": {"stringValue": "Jane"},
            "price": {"integerValue": "50"},
            "vip": {"booleanValue": true},
            "tags": {"arrayValue": {"values": [{"stringValue": "a"}, {"nullValue": null}]}},
            "empty": {"mapValue": {}},
            "odd": {"geoPointValue": {"latitude": 1.0}},
        });
        let data = Value::Object(from_fields(fields.as_object().unwrap()));

        assert_eq!(
            data,
            serde_json::json!({
                "customer_name": "Jane",
                "price": 50,
                "vip": true,
                "tags": ["a", null],
                "empty": {},
                "odd": null,
            })
        );
    }

    #[test]
    fn test_document_id_from_name() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/bookings/AbC123"),
            "AbC123"
        );
        assert_eq!(document_id("plain"), "plain");
    }

    #[test]
    fn test_non_object_body_rejected() {
        assert!(matches!(
            body_for(&serde_json::json!([1, 2])),
            Err(AppError::StoreUnavailable(_))
        ));
    }
}
