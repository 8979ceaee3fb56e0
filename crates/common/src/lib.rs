//! Shared helpers for the contacts API workspace: logging setup,
//! filesystem bootstrap and small wire types.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_body_serializes_as_message_field() {
        let body = types::MessageBody::new("Not found");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Not found"}));
    }
}
