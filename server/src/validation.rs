use crate::error::AppError;
use crate::models::ranking::{SaveRequest, TimeSubmission, REQUIRED_FIELDS_MESSAGE};

fn required_fields() -> AppError {
    AppError::BadRequest(REQUIRED_FIELDS_MESSAGE.into())
}

/// Parses a raw save body. Anything that is not an object with a string
/// `nome` and a numeric `tempo` counts as missing fields.
pub fn parse_submission(body: &[u8]) -> Result<TimeSubmission, AppError> {
    let req: SaveRequest = serde_json::from_slice(body).map_err(|_| required_fields())?;
    validate_submission(req)
}

/// Only absence is rejected: an empty name fails, but any time value
/// (zero and negatives included) is accepted as sent.
pub fn validate_submission(req: SaveRequest) -> Result<TimeSubmission, AppError> {
    match (req.nome, req.tempo) {
        (Some(nome), Some(tempo)) if !nome.is_empty() => Ok(TimeSubmission { nome, tempo }),
        _ => Err(required_fields()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bad_request(result: Result<TimeSubmission, AppError>) {
        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, REQUIRED_FIELDS_MESSAGE),
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_zero_and_negative_times() {
        let sub = parse_submission(br#"{"nome":"Ana","tempo":0}"#).unwrap();
        assert_eq!(sub.tempo, 0.0);
        let sub = parse_submission(br#"{"nome":"Ana","tempo":-3.5}"#).unwrap();
        assert_eq!(sub.tempo, -3.5);
    }

    #[test]
    fn test_rejects_missing_fields() {
        assert_bad_request(parse_submission(br#"{"tempo":12.5}"#));
        assert_bad_request(parse_submission(br#"{"nome":"Ana"}"#));
        assert_bad_request(parse_submission(br#"{"nome":"","tempo":12.5}"#));
        assert_bad_request(parse_submission(br#"{"nome":"Ana","tempo":null}"#));
        assert_bad_request(parse_submission(br#"{}"#));
    }

    #[test]
    fn test_rejects_malformed_bodies() {
        assert_bad_request(parse_submission(b""));
        assert_bad_request(parse_submission(b"not json"));
        assert_bad_request(parse_submission(br#"{"nome":"Ana","tempo":"fast"}"#));
        assert_bad_request(parse_submission(br#"[1, 2]"#));
    }

    #[test]
    fn test_keeps_name_as_sent() {
        let sub = parse_submission(br#"{"nome":" Ana ","tempo":1.25,"extra":true}"#).unwrap();
        assert_eq!(sub.nome, " Ana ");
        assert_eq!(sub.tempo, 1.25);
    }
}
