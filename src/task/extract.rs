//! Ordered extraction strategies over provider JSON envelopes.
//!
//! The task service has shipped more than one response shape; each probe
//! list is tried in priority order and the first hit wins. The observed
//! variants are pinned as fixtures in the tests below so schema drift shows
//! up as a test failure instead of a silent `None`.

use serde_json::Value;

/// Pull the task identifier out of a submission response.
pub fn task_id(body: &Value) -> Option<String> {
    let candidates = [
        body.pointer("/data/task_id"),
        body.get("task_id"),
        body.pointer("/data/id"),
        body.get("id"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string))
}

/// Pull the provider status string out of a poll response.
pub fn status(body: &Value) -> Option<&str> {
    body.pointer("/data/status")
        .or_else(|| body.get("status"))
        .and_then(Value::as_str)
}

/// Pull the result artifact (an image URL) out of a completed poll response.
pub fn result_url(body: &Value) -> Option<String> {
    let candidates = [
        body.pointer("/data/generated/0"),
        body.pointer("/data/output/image_url"),
        body.pointer("/data/result/url"),
        body.pointer("/output/image_urls/0"),
        body.get("result"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string))
}

/// Pull a diagnostic message out of a failed poll response, falling back to
/// the whole body so a terminal failure is never surfaced without detail.
pub fn failure_detail(body: &Value) -> String {
    body.pointer("/data/error/message")
        .or_else(|| body.pointer("/data/error"))
        .or_else(|| body.pointer("/error/message"))
        .or_else(|| body.get("error"))
        .or_else(|| body.get("message"))
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_id_prefers_nested_data_variant() {
        let body = json!({"data": {"task_id": "t-nested"}, "task_id": "t-flat"});
        assert_eq!(task_id(&body).as_deref(), Some("t-nested"));
    }

    #[test]
    fn task_id_falls_back_to_flat_and_id_variants() {
        assert_eq!(
            task_id(&json!({"task_id": "t1"})).as_deref(),
            Some("t1")
        );
        assert_eq!(
            task_id(&json!({"data": {"id": "t2"}})).as_deref(),
            Some("t2")
        );
        assert_eq!(task_id(&json!({"id": "t3"})).as_deref(), Some("t3"));
    }

    #[test]
    fn task_id_absent_yields_none() {
        assert!(task_id(&json!({"data": {}})).is_none());
        assert!(task_id(&json!({"data": {"task_id": 42}})).is_none());
    }

    #[test]
    fn status_probes_nested_then_flat() {
        assert_eq!(status(&json!({"data": {"status": "pending"}})), Some("pending"));
        assert_eq!(status(&json!({"status": "completed"})), Some("completed"));
        assert_eq!(status(&json!({"data": {}})), None);
    }

    // Fixture: the envelope observed from the generation service's v1 API.
    #[test]
    fn result_url_from_generated_array() {
        let body = json!({"data": {"status": "COMPLETED", "generated": ["https://x/y.png"]}});
        assert_eq!(result_url(&body).as_deref(), Some("https://x/y.png"));
    }

    // Fixture: the nested-output shape some deployments return instead.
    #[test]
    fn result_url_from_output_object() {
        let body = json!({"data": {"output": {"image_url": "https://x/out.png"}}});
        assert_eq!(result_url(&body).as_deref(), Some("https://x/out.png"));
        let body = json!({"data": {"result": {"url": "https://x/res.png"}}});
        assert_eq!(result_url(&body).as_deref(), Some("https://x/res.png"));
        let body = json!({"output": {"image_urls": ["https://x/first.png", "https://x/second.png"]}});
        assert_eq!(result_url(&body).as_deref(), Some("https://x/first.png"));
    }

    #[test]
    fn result_url_absent_yields_none() {
        let body = json!({"data": {"status": "COMPLETED"}});
        assert!(result_url(&body).is_none());
    }

    #[test]
    fn failure_detail_prefers_structured_messages() {
        let body = json!({"data": {"error": {"message": "quota exhausted"}}});
        assert_eq!(failure_detail(&body), "quota exhausted");
        let body = json!({"error": "bad prompt"});
        assert_eq!(failure_detail(&body), "bad prompt");
    }

    #[test]
    fn failure_detail_falls_back_to_whole_body() {
        let body = json!({"data": {"status": "FAILED"}});
        assert!(failure_detail(&body).contains("FAILED"));
    }
}
