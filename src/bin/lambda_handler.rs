//! AWS Lambda handler for result grading and payment status
//!
//! Accepts a Lambda Function URL event whose JSON body carries an `action`:
//! `gradeResult` grades a result submission, `paymentStatus` computes the due
//! date and overdue flag for a payment record, `gradeBatch` grades many
//! submissions in parallel.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use rayon::prelude::*;
use school_results::payment::{PaymentConfig, PaymentLabel, PaymentState, PaymentStatus};
use school_results::{EngineConfig, GradedResult, ResultSubmission, ScaleId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The parts of a Function URL event this handler reads
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionUrlEvent {
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    is_base64_encoded: bool,
    #[serde(default)]
    request_context: Option<RequestContext>,
}

#[derive(Debug, Default, Deserialize)]
struct RequestContext {
    #[serde(default)]
    http: Option<HttpContext>,
}

#[derive(Debug, Default, Deserialize)]
struct HttpContext {
    #[serde(default)]
    method: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
enum ActionRequest {
    #[serde(rename_all = "camelCase")]
    GradeResult {
        submission: ResultSubmission,
        #[serde(default)]
        scale: Option<ScaleId>,
        #[serde(default)]
        check_curriculum: bool,
    },
    #[serde(rename_all = "camelCase")]
    GradeBatch {
        submissions: Vec<ResultSubmission>,
        #[serde(default)]
        scale: Option<ScaleId>,
    },
    #[serde(rename_all = "camelCase")]
    PaymentStatus {
        payment: PaymentRecord,
        /// Evaluate as of this instant instead of now
        #[serde(default)]
        now: Option<DateTime<Utc>>,
        #[serde(default)]
        config: Option<PaymentConfig>,
    },
}

/// Payment record as sent by the client; the cycle length falls back to the request config
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRecord {
    payment_amount: f64,
    has_paid: bool,
    #[serde(default)]
    last_payment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    cycle_length_days: Option<u32>,
}

impl PaymentRecord {
    fn into_state(self, config: &PaymentConfig) -> PaymentState {
        PaymentState {
            payment_amount: self.payment_amount,
            has_paid: self.has_paid,
            last_payment_date: self.last_payment_date,
            cycle_length_days: self.cycle_length_days.unwrap_or(config.cycle_length_days),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResponse {
    #[serde(flatten)]
    status: PaymentStatus,
    label: PaymentLabel,
    payment_amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum BatchEntry {
    Graded(GradedResult),
    Rejected { error: String },
}

fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "POST, OPTIONS",
        "Access-Control-Allow-Headers": "Content-Type",
    })
}

fn response(status: u16, body: &Value) -> Value {
    json!({
        "statusCode": status,
        "headers": cors_headers(),
        "body": body.to_string(),
    })
}

fn error_response(status: u16, message: &str) -> Value {
    response(status, &json!({ "error": message }))
}

fn decode_body(event: &FunctionUrlEvent) -> Result<String, String> {
    let raw = event.body.clone().unwrap_or_else(|| "{}".to_string());
    if !event.is_base64_encoded {
        return Ok(raw);
    }
    let bytes = general_purpose::STANDARD
        .decode(raw.trim())
        .map_err(|e| format!("body is not valid base64: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("body is not UTF-8: {}", e))
}

fn handle_action(request: ActionRequest, now: DateTime<Utc>) -> Result<Value, (u16, String)> {
    match request {
        ActionRequest::GradeResult {
            submission,
            scale,
            check_curriculum,
        } => {
            let config = EngineConfig {
                scale: scale.unwrap_or(ScaleId::Combined),
                check_curriculum,
                ..EngineConfig::default()
            };
            let mut registry = config.registry().map_err(|e| (500, e.to_string()))?;
            let graded = registry.submit(&submission).map_err(|e| (400, e.to_string()))?;
            serde_json::to_value(graded).map_err(|e| (500, e.to_string()))
        }
        ActionRequest::GradeBatch { submissions, scale } => {
            let config = EngineConfig {
                scale: scale.unwrap_or(ScaleId::Combined),
                ..EngineConfig::default()
            };
            let scale = config.grading_scale().map_err(|e| (500, e.to_string()))?;
            let entries: Vec<BatchEntry> = submissions
                .par_iter()
                .map(|s| match s.grade(&scale) {
                    Ok(graded) => BatchEntry::Graded(graded),
                    Err(e) => BatchEntry::Rejected { error: e.to_string() },
                })
                .collect();
            serde_json::to_value(entries).map_err(|e| (500, e.to_string()))
        }
        ActionRequest::PaymentStatus {
            payment,
            now: as_of,
            config,
        } => {
            let config = config.unwrap_or_default();
            let state = payment.into_state(&config);
            let (current, status) = state
                .assess(as_of.unwrap_or(now), config.never_paid)
                .map_err(|e| (400, e.to_string()))?;
            let body = PaymentResponse {
                status,
                label: current.label(),
                payment_amount: current.payment_amount,
            };
            serde_json::to_value(body).map_err(|e| (500, e.to_string()))
        }
    }
}

fn process(payload: Value, now: DateTime<Utc>) -> Value {
    let event: FunctionUrlEvent = serde_json::from_value(payload).unwrap_or_default();

    let method = event
        .request_context
        .as_ref()
        .and_then(|ctx| ctx.http.as_ref())
        .map(|http| http.method.as_str())
        .unwrap_or("POST");
    if method.eq_ignore_ascii_case("OPTIONS") {
        return json!({ "statusCode": 200, "headers": cors_headers(), "body": "" });
    }

    let body = match decode_body(&event) {
        Ok(body) => body,
        Err(message) => return error_response(400, &message),
    };

    let request: ActionRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => return error_response(400, &format!("Invalid request: {}", e)),
    };

    match handle_action(request, now) {
        Ok(value) => response(200, &value),
        Err((status, message)) => {
            log::warn!("request rejected ({}): {}", status, message);
            error_response(status, &message)
        }
    }
}

async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let (payload, _context) = event.into_parts();
    Ok(process(payload, Utc::now()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    /// Run a JSON body through the full event path, returning status and parsed body
    fn invoke(body: &Value) -> (u64, Value) {
        let event = json!({
            "body": body.to_string(),
            "isBase64Encoded": false,
            "requestContext": { "http": { "method": "POST" } }
        });
        parse_response(process(event, now()))
    }

    fn parse_response(response: Value) -> (u64, Value) {
        let status = response["statusCode"].as_u64().unwrap();
        let body = response["body"].as_str().unwrap();
        let body = if body.is_empty() { Value::Null } else { serde_json::from_str(body).unwrap() };
        (status, body)
    }

    fn payment_request(payment: Value, config: Option<Value>) -> Value {
        let mut request = json!({ "action": "paymentStatus", "payment": payment });
        if let Some(config) = config {
            request["config"] = config;
        }
        request
    }

    #[test]
    fn test_grade_result_action() {
        let body = json!({
            "action": "gradeResult",
            "submission": {
                "studentId": "stu-1",
                "className": "9",
                "semester": "1st",
                "marks": {
                    "examType": "combined",
                    "subjects": [
                        { "subject": "Math", "mcqScore": 25, "cqScore": 60 },
                        { "subject": "English", "mcqScore": 20, "cqScore": 45 }
                    ]
                }
            }
        });
        let request: ActionRequest = serde_json::from_value(body).unwrap();
        let value = handle_action(request, now()).unwrap();
        assert_eq!(value["totalMarks"], 150);
        assert_eq!(value["subjectCount"], 2);
    }

    #[test]
    fn test_payment_status_action() {
        let body = json!({
            "action": "paymentStatus",
            "payment": {
                "paymentAmount": 1200,
                "hasPaid": false,
                "lastPaymentDate": "2024-02-14T10:30:00Z"
            }
        });
        let request: ActionRequest = serde_json::from_value(body).unwrap();
        let value = handle_action(request, now()).unwrap();
        assert_eq!(value["daysLeft"], 0);
        assert_eq!(value["isOverdue"], true);
        assert_eq!(value["label"], "Pending");
    }

    #[test]
    fn test_invalid_score_is_bad_request() {
        let body = json!({
            "action": "gradeResult",
            "submission": {
                "studentId": "stu-1",
                "className": "9",
                "semester": "1st",
                "marks": { "examType": "mcq", "subjects": [{ "subject": "Math", "mcqScore": 31 }] }
            }
        });
        let request: ActionRequest = serde_json::from_value(body).unwrap();
        let (status, _) = handle_action(request, now()).unwrap_err();
        assert_eq!(status, 400);
    }

    #[test]
    fn test_decode_base64_body() {
        let event = FunctionUrlEvent {
            body: Some("eyJhIjoxfQ==".to_string()),
            is_base64_encoded: true,
            request_context: None,
        };
        assert_eq!(decode_body(&event).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_payment_cycle_length_from_config() {
        let request = payment_request(
            json!({ "paymentAmount": 800, "hasPaid": true, "lastPaymentDate": "2024-03-05T10:30:00Z" }),
            Some(json!({ "cycleLengthDays": 7 })),
        );
        let (status, body) = invoke(&request);
        assert_eq!(status, 200);

        let due: DateTime<Utc> = body["nextPaymentDue"].as_str().unwrap().parse().unwrap();
        assert_eq!(due, Utc.with_ymd_and_hms(2024, 3, 12, 10, 30, 0).unwrap());
        assert_eq!(body["daysLeft"], 0);
    }

    #[test]
    fn test_payment_record_cycle_length_wins() {
        let request = payment_request(
            json!({
                "paymentAmount": 800,
                "hasPaid": true,
                "lastPaymentDate": "2024-03-05T10:30:00Z",
                "cycleLengthDays": 14
            }),
            Some(json!({ "cycleLengthDays": 7 })),
        );
        let (_, body) = invoke(&request);
        assert_eq!(body["daysLeft"], 4);
        assert_eq!(body["label"], "Paid");
    }

    #[test]
    fn test_payment_elapsed_cycle_rolls_over() {
        let request = payment_request(
            json!({ "paymentAmount": 1200, "hasPaid": true, "lastPaymentDate": "2024-01-01T00:00:00Z" }),
            None,
        );
        let (status, body) = invoke(&request);
        assert_eq!(status, 200);
        assert_eq!(body["label"], "Pending");
        assert_eq!(body["isOverdue"], true);
    }

    #[test]
    fn test_payment_rejects_negative_amount() {
        let request = payment_request(json!({ "paymentAmount": -500, "hasPaid": false }), None);
        let (status, body) = invoke(&request);
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("-500"));
    }

    #[test]
    fn test_payment_rejects_huge_cycle_length() {
        let request = payment_request(
            json!({
                "paymentAmount": 500,
                "hasPaid": true,
                "lastPaymentDate": "2024-03-05T10:30:00Z",
                "cycleLengthDays": 4_000_000_000u64
            }),
            None,
        );
        let (status, _) = invoke(&request);
        assert_eq!(status, 400);

        let zero = payment_request(json!({ "paymentAmount": 500, "hasPaid": false }), Some(json!({ "cycleLengthDays": 0 })));
        assert_eq!(invoke(&zero).0, 400);
    }

    #[test]
    fn test_grade_batch_action() {
        let request = json!({
            "action": "gradeBatch",
            "submissions": [
                {
                    "studentId": "stu-1",
                    "className": "9",
                    "semester": "1st",
                    "marks": { "examType": "mcq", "subjects": [{ "subject": "Math", "mcqScore": 24 }] }
                },
                {
                    "studentId": "stu-2",
                    "className": "9",
                    "semester": "1st",
                    "marks": { "examType": "mcq", "subjects": [{ "subject": "Math", "mcqScore": 40 }] }
                }
            ]
        });
        let (status, body) = invoke(&request);
        assert_eq!(status, 200);

        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["studentId"], "stu-1");
        assert_eq!(entries[0]["totalMarks"], 24);
        assert!(entries[1]["error"].is_string());
    }

    #[test]
    fn test_options_preflight() {
        let event = json!({ "requestContext": { "http": { "method": "OPTIONS" } } });
        let response = process(event, now());
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
        assert_eq!(response["body"], "");
    }

    #[test]
    fn test_malformed_json_body() {
        let event = json!({ "body": "{not json", "isBase64Encoded": false });
        let (status, body) = parse_response(process(event, now()));
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
    }

    #[test]
    fn test_bad_base64_body() {
        let event = json!({ "body": "%%%not-base64%%%", "isBase64Encoded": true });
        let (status, body) = parse_response(process(event, now()));
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("base64"));
    }

    #[test]
    fn test_unknown_action() {
        let (status, _) = invoke(&json!({ "action": "deleteResult" }));
        assert_eq!(status, 400);
    }
}
