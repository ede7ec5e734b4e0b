//! # Input Normalization
//!
//! Upstream clients historically used several spellings for the same fields
//! (`txHash` vs `transactionHash`, `buyer` vs `buyerAddress`, camelCase vs
//! snake_case). Requests are normalized into one canonical schema here, at
//! the boundary; nothing past this module ever sees an alias.

use crate::error::ApiError;
use escrow_engine::{EscrowEvent, EscrowEventKind};
use kyc_gate::Document;
use serde_json::{Map, Value};
use shared_types::amount::parse_amount;
use shared_types::{Address, Amount, OwnerId, PropertyId, TokenId, TxHash};
use uuid::Uuid;

/// A JSON object with alias-aware field access. Each `take_*` removes the
/// first matching alias so leftover fields can be detected if needed.
pub struct AliasedObject(Map<String, Value>);

impl AliasedObject {
    /// Wrap a JSON body; rejects non-objects.
    pub fn new(body: Value) -> Result<Self, ApiError> {
        match body {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ApiError::bad_request("Request body must be a JSON object")),
        }
    }

    fn take(&mut self, aliases: &[&str]) -> Option<Value> {
        for name in aliases {
            if let Some(value) = self.0.remove(*name) {
                if !value.is_null() {
                    return Some(value);
                }
            }
        }
        None
    }

    /// A required string field under any of its aliases.
    pub fn required_str(&mut self, aliases: &[&str]) -> Result<String, ApiError> {
        match self.take(aliases) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(ApiError::bad_request(format!(
                "Field '{}' must be a string",
                aliases[0]
            ))),
            None => Err(ApiError::bad_request(format!(
                "Missing required field '{}'",
                aliases[0]
            ))),
        }
    }

    /// An optional string field.
    pub fn optional_str(&mut self, aliases: &[&str]) -> Result<Option<String>, ApiError> {
        match self.take(aliases) {
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(ApiError::bad_request(format!(
                "Field '{}' must be a string",
                aliases[0]
            ))),
            None => Ok(None),
        }
    }

    /// A required address field.
    pub fn address(&mut self, aliases: &[&str]) -> Result<Address, ApiError> {
        Ok(self.required_str(aliases)?.parse::<Address>()?)
    }

    /// A required transaction hash field.
    pub fn tx_hash(&mut self, aliases: &[&str]) -> Result<TxHash, ApiError> {
        Ok(self.required_str(aliases)?.parse::<TxHash>()?)
    }

    /// A required token id, accepted as a JSON number or numeric string.
    pub fn token_id(&mut self, aliases: &[&str]) -> Result<TokenId, ApiError> {
        match self.take(aliases) {
            Some(Value::Number(n)) => n
                .as_u64()
                .map(TokenId)
                .ok_or_else(|| ApiError::bad_request("Token id must be a non-negative integer")),
            Some(Value::String(s)) => s
                .parse::<u64>()
                .map(TokenId)
                .map_err(|_| ApiError::bad_request(format!("Invalid token id: {}", s))),
            Some(_) => Err(ApiError::bad_request("Token id must be a number or string")),
            None => Err(ApiError::bad_request(format!(
                "Missing required field '{}'",
                aliases[0]
            ))),
        }
    }

    /// A required amount in minor units, accepted as a decimal string or a
    /// JSON integer.
    pub fn amount(&mut self, aliases: &[&str]) -> Result<Amount, ApiError> {
        match self.take(aliases) {
            Some(Value::String(s)) => Ok(parse_amount(&s)?),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Amount::from)
                .ok_or_else(|| ApiError::bad_request("Amount must be a non-negative integer")),
            Some(_) => Err(ApiError::bad_request("Amount must be a string or integer")),
            None => Err(ApiError::bad_request(format!(
                "Missing required field '{}'",
                aliases[0]
            ))),
        }
    }

    /// An optional array of strings; a missing field means an empty list.
    pub fn string_list(&mut self, aliases: &[&str]) -> Result<Vec<String>, ApiError> {
        match self.take(aliases) {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    _ => Err(ApiError::bad_request(format!(
                        "Field '{}' must be an array of strings",
                        aliases[0]
                    ))),
                })
                .collect(),
            Some(_) => Err(ApiError::bad_request(format!(
                "Field '{}' must be an array",
                aliases[0]
            ))),
            None => Ok(Vec::new()),
        }
    }

    /// A required timestamp (Unix seconds).
    pub fn timestamp(&mut self, aliases: &[&str]) -> Result<u64, ApiError> {
        match self.take(aliases) {
            Some(Value::Number(n)) => n
                .as_u64()
                .ok_or_else(|| ApiError::bad_request("Timestamp must be a non-negative integer")),
            Some(Value::String(s)) => s
                .parse::<u64>()
                .map_err(|_| ApiError::bad_request(format!("Invalid timestamp: {}", s))),
            Some(_) => Err(ApiError::bad_request("Timestamp must be a number")),
            None => Err(ApiError::bad_request(format!(
                "Missing required field '{}'",
                aliases[0]
            ))),
        }
    }
}

/// Canonical shape of `POST /escrow/validate` and cost queries.
#[derive(Debug)]
pub struct CreateEscrowQuery {
    /// Selling party (token owner).
    pub seller: Address,
    /// Token under sale.
    pub token_id: TokenId,
    /// Buying party.
    pub buyer: Address,
    /// Sale price in minor units.
    pub price: Amount,
}

/// Normalize a create/validate request body.
pub fn normalize_create(body: Value) -> Result<CreateEscrowQuery, ApiError> {
    let mut obj = AliasedObject::new(body)?;
    Ok(CreateEscrowQuery {
        seller: obj.address(&["seller", "sellerAddress", "seller_address", "caller"])?,
        token_id: obj.token_id(&["tokenId", "token_id"])?,
        buyer: obj.address(&["buyer", "buyerAddress", "buyer_address"])?,
        price: obj.amount(&["price", "amount"])?,
    })
}

/// Canonical shape of `POST /escrow/transaction`: a confirmed contract event
/// posted back by a client, plus the property it settles against if known.
#[derive(Debug)]
pub struct TransactionReport {
    /// The reported event.
    pub event: EscrowEvent,
    /// Property id supplied by the client, if any.
    pub property_id: Option<PropertyId>,
    /// False when the contract reported the transaction as reverted.
    pub confirmed: bool,
}

/// Normalize a posted transaction body. An absent `status` field means the
/// transaction committed.
pub fn normalize_transaction(body: Value) -> Result<TransactionReport, ApiError> {
    let mut obj = AliasedObject::new(body)?;
    let kind = parse_event_kind(&obj.required_str(&["eventType", "event_type", "type"])?)?;
    let event = EscrowEvent {
        kind,
        token_id: obj.token_id(&["tokenId", "token_id"])?,
        buyer: obj.address(&["buyer", "buyerAddress", "buyer_address"])?,
        seller: obj.address(&["seller", "sellerAddress", "seller_address"])?,
        price: obj.amount(&["price", "amount"])?,
        fee: obj.amount(&["fee", "escrowFee", "escrow_fee"])?,
        tx_hash: obj.tx_hash(&["txHash", "transactionHash", "transaction_hash", "tx_hash"])?,
        timestamp: obj.timestamp(&["timestamp", "blockTimestamp", "block_timestamp"])?,
    };
    let property_id = obj
        .optional_str(&["propertyId", "property_id"])?
        .map(PropertyId::new);
    let confirmed = match obj.optional_str(&["status", "txStatus", "tx_status"])? {
        Some(s) => parse_tx_status(&s)?,
        None => true,
    };
    Ok(TransactionReport {
        event,
        property_id,
        confirmed,
    })
}

fn parse_tx_status(s: &str) -> Result<bool, ApiError> {
    match s {
        "confirmed" | "success" => Ok(true),
        "failed" | "reverted" => Ok(false),
        other => Err(ApiError::bad_request(format!(
            "Unknown transaction status: {}",
            other
        ))),
    }
}

/// Resolve an owner string into the canonical identity: a wallet address or
/// an internal user record id.
pub fn parse_owner(s: &str) -> Result<OwnerId, ApiError> {
    if let Ok(address) = s.parse::<Address>() {
        return Ok(OwnerId::Wallet(address));
    }
    s.parse::<Uuid>()
        .map(OwnerId::Internal)
        .map_err(|_| ApiError::bad_request(format!("Invalid owner identity: {}", s)))
}

/// Canonical shape of `POST /properties`.
#[derive(Debug)]
pub struct SubmitPropertyRequest {
    /// Resolved owner identity.
    pub owner: OwnerId,
    /// Listing title.
    pub name: String,
    /// Image URIs.
    pub images: Vec<String>,
}

/// Normalize a property submission body.
pub fn normalize_submit_property(body: Value) -> Result<SubmitPropertyRequest, ApiError> {
    let mut obj = AliasedObject::new(body)?;
    Ok(SubmitPropertyRequest {
        owner: parse_owner(&obj.required_str(&["owner", "ownerId", "owner_id"])?)?,
        name: obj.required_str(&["name", "title"])?,
        images: obj.string_list(&["images", "imageUrls", "image_urls"])?,
    })
}

/// Canonical shape of `POST /users/register`.
#[derive(Debug)]
pub struct RegisterRequest {
    /// Wallet address the record is keyed on.
    pub address: Address,
    /// Submitted identity documents.
    pub documents: Vec<Document>,
}

/// Normalize a registration body. Each document accepts `docType` or
/// `doc_type`.
pub fn normalize_register(body: Value) -> Result<RegisterRequest, ApiError> {
    let mut obj = AliasedObject::new(body)?;
    let address = obj.address(&["walletAddress", "wallet_address", "address"])?;
    let documents = match obj.take(&["documents", "docs"]) {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| {
                let mut doc = AliasedObject::new(item)
                    .map_err(|_| ApiError::bad_request("Each document must be a JSON object"))?;
                Ok(Document {
                    doc_type: doc.required_str(&["docType", "doc_type", "type"])?,
                    uri: doc.required_str(&["uri", "url"])?,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?,
        Some(_) => {
            return Err(ApiError::bad_request("Field 'documents' must be an array"));
        }
        None => Vec::new(),
    };
    Ok(RegisterRequest { address, documents })
}

/// Accepts both the contract event names (`EscrowCreated`) and the snake_case
/// API spelling (`escrow_created`).
fn parse_event_kind(s: &str) -> Result<EscrowEventKind, ApiError> {
    match s {
        "EscrowCreated" | "escrow_created" | "created" => Ok(EscrowEventKind::Created),
        "FundsDeposited" | "funds_deposited" => Ok(EscrowEventKind::FundsDeposited),
        "EscrowCompleted" | "escrow_completed" | "completed" => Ok(EscrowEventKind::Completed),
        "EscrowCancelled" | "escrow_cancelled" | "cancelled" => Ok(EscrowEventKind::Cancelled),
        "FundsRefunded" | "funds_refunded" | "refunded" => Ok(EscrowEventKind::Refunded),
        other => Err(ApiError::bad_request(format!(
            "Unknown event type: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_accepts_camel_case_aliases() {
        let q = normalize_create(json!({
            "sellerAddress": "0x1111111111111111111111111111111111111111",
            "tokenId": 7,
            "buyerAddress": "0x2222222222222222222222222222222222222222",
            "price": "1000000000000000000"
        }))
        .unwrap();
        assert_eq!(q.token_id, TokenId(7));
        assert_eq!(q.price, Amount::from(1_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_create_accepts_canonical_names() {
        let q = normalize_create(json!({
            "seller": "0x1111111111111111111111111111111111111111",
            "token_id": "7",
            "buyer": "0x2222222222222222222222222222222222222222",
            "price": 100
        }))
        .unwrap();
        assert_eq!(q.token_id, TokenId(7));
        assert_eq!(q.price, Amount::from(100u64));
    }

    #[test]
    fn test_missing_field_names_canonical_alias() {
        let err = normalize_create(json!({
            "seller": "0x1111111111111111111111111111111111111111",
            "tokenId": 7,
            "price": "100"
        }))
        .unwrap_err();
        assert!(err.message.contains("buyer"));
    }

    #[test]
    fn test_bad_address_rejected() {
        let err = normalize_create(json!({
            "seller": "0x1234",
            "tokenId": 7,
            "buyer": "0x2222222222222222222222222222222222222222",
            "price": "100"
        }))
        .unwrap_err();
        assert!(err.message.contains("Invalid address"));
    }

    #[test]
    fn test_transaction_aliases_and_event_names() {
        let report = normalize_transaction(json!({
            "eventType": "EscrowCompleted",
            "tokenId": 7,
            "buyer": "0x2222222222222222222222222222222222222222",
            "seller": "0x1111111111111111111111111111111111111111",
            "price": "1000000",
            "fee": "25000",
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "timestamp": 1700000000
        }))
        .unwrap();
        assert_eq!(report.event.kind, EscrowEventKind::Completed);
        assert!(report.property_id.is_none());
        assert!(report.confirmed);

        // Same body with the other spellings.
        let report = normalize_transaction(json!({
            "type": "escrow_completed",
            "token_id": 7,
            "buyerAddress": "0x2222222222222222222222222222222222222222",
            "sellerAddress": "0x1111111111111111111111111111111111111111",
            "amount": "1000000",
            "escrowFee": "25000",
            "txHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "timestamp": 1700000000,
            "propertyId": "prop-1"
        }))
        .unwrap();
        assert_eq!(report.event.kind, EscrowEventKind::Completed);
        assert_eq!(report.property_id, Some(PropertyId::from("prop-1")));
    }

    #[test]
    fn test_transaction_status_aliases() {
        let body = |status: &str| {
            json!({
                "eventType": "FundsDeposited",
                "tokenId": 7,
                "buyer": "0x2222222222222222222222222222222222222222",
                "seller": "0x1111111111111111111111111111111111111111",
                "price": "1000000",
                "fee": "25000",
                "txHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
                "timestamp": 1700000000,
                "status": status
            })
        };
        assert!(normalize_transaction(body("confirmed")).unwrap().confirmed);
        assert!(!normalize_transaction(body("reverted")).unwrap().confirmed);
        assert!(!normalize_transaction(body("failed")).unwrap().confirmed);

        let err = normalize_transaction(body("pending")).unwrap_err();
        assert!(err.message.contains("Unknown transaction status"));
    }

    #[test]
    fn test_parse_owner_resolves_both_shapes() {
        let wallet = parse_owner("0xab5801a7d398351b8be11c439e05c5b3259aec9b").unwrap();
        assert!(matches!(wallet, OwnerId::Wallet(_)));

        let internal = parse_owner("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert!(matches!(internal, OwnerId::Internal(_)));

        assert!(parse_owner("not-an-identity").is_err());
    }

    #[test]
    fn test_submit_property_defaults_images_empty() {
        let req = normalize_submit_property(json!({
            "owner": "0xab5801a7d398351b8be11c439e05c5b3259aec9b",
            "title": "Dockside Loft"
        }))
        .unwrap();
        assert_eq!(req.name, "Dockside Loft");
        assert!(req.images.is_empty());
    }

    #[test]
    fn test_register_normalizes_document_aliases() {
        let req = normalize_register(json!({
            "walletAddress": "0xab5801a7d398351b8be11c439e05c5b3259aec9b",
            "documents": [
                {"docType": "passport", "uri": "ipfs://doc-1"},
                {"doc_type": "utility_bill", "url": "ipfs://doc-2"}
            ]
        }))
        .unwrap();
        assert_eq!(req.documents.len(), 2);
        assert_eq!(req.documents[0].doc_type, "passport");
        assert_eq!(req.documents[1].uri, "ipfs://doc-2");
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let err = normalize_transaction(json!({
            "eventType": "EscrowExploded",
            "tokenId": 7,
            "buyer": "0x2222222222222222222222222222222222222222",
            "seller": "0x1111111111111111111111111111111111111111",
            "price": "1",
            "fee": "0",
            "txHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "timestamp": 1
        }))
        .unwrap_err();
        assert!(err.message.contains("Unknown event type"));
    }
}
