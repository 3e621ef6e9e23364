// OpenAI models listing
use super::*;
use crate::proxy::common::random_id::random_hex;

const MOCK_MODELS: &[&str] = &["gpt-3.5-turbo", "gpt-4"];
const MOCK_CREATED: i64 = 1_677_610_602;

fn mock_model(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "object": "model",
        "created": MOCK_CREATED,
        "owned_by": "openai",
        "permission": [{
            "id": format!("modelperm-{}", random_hex(12)),
            "object": "model_permission",
            "created": MOCK_CREATED,
            "allow_create_engine": false,
            "allow_sampling": true,
            "allow_logprobs": true,
            "allow_search_indices": false,
            "allow_view": true,
            "allow_fine_tuning": false,
            "organization": "*",
            "group": null,
            "is_blocking": false
        }],
        "root": id,
        "parent": null
    })
}

pub async fn handle_list_models() -> impl IntoResponse {
    let data: Vec<_> = MOCK_MODELS.iter().map(|id| mock_model(id)).collect();
    Json(json!({
        "object": "list",
        "data": data
    }))
}
