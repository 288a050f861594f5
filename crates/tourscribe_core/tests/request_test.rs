use tourscribe_core::{
    FinishReason, GenerateRequest, GenerateResponse, Message, Output, ResponseFormat, Role, Tool,
};

#[test]
fn test_request_builder_defaults() {
    let request = GenerateRequest::builder()
        .messages(vec![Message::user("hello")])
        .build()
        .expect("valid request");

    assert!(request.system_instruction().is_none());
    assert!(request.tools().is_empty());
    assert_eq!(*request.response_format(), ResponseFormat::Text);
    assert!(request.temperature().is_none());
    assert!(request.model().is_none());
}

#[test]
fn test_request_builder_requires_messages() {
    assert!(GenerateRequest::builder().build().is_err());
}

#[test]
fn test_request_builder_full() {
    let request = GenerateRequest::builder()
        .system_instruction("You are a tour director.")
        .messages(vec![Message::user("Review this draft")])
        .response_format(ResponseFormat::Json)
        .temperature(0.2)
        .max_tokens(512u32)
        .model("gemini-2.5-flash")
        .build()
        .expect("valid request");

    assert_eq!(request.system_instruction().as_deref(), Some("You are a tour director."));
    assert_eq!(*request.max_tokens(), Some(512));
    assert_eq!(request.model().as_deref(), Some("gemini-2.5-flash"));
    assert_eq!(
        request.prompt_chars(),
        "You are a tour director.".len() + "Review this draft".len()
    );
}

#[test]
fn test_message_roles() {
    assert_eq!(*Message::user("a").role(), Role::User);
    assert_eq!(*Message::model("b").role(), Role::Model);
}

#[test]
fn test_tool_display() {
    assert_eq!(Tool::WebSearch.to_string(), "web_search");
    assert_eq!(Tool::Maps.to_string(), "maps");
}

#[test]
fn test_response_text_skips_blank() {
    let empty = GenerateResponse::new(vec![Output::Text("   ".to_string())]);
    assert_eq!(empty.text(), None);

    let none = GenerateResponse::new(vec![]);
    assert_eq!(none.text(), None);
}

#[test]
fn test_response_text_serializes_json() {
    let response = GenerateResponse::new(vec![Output::Json(serde_json::json!({"is_ready": true}))])
        .with_finish_reason(FinishReason::Stop);

    assert_eq!(response.text(), Some(r#"{"is_ready":true}"#.to_string()));
    assert_eq!(*response.finish_reason(), Some(FinishReason::Stop));
}
