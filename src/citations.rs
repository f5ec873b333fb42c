use crate::gemini::ModelReply;
use crate::models::Source;

// Grounding metadata arrives in whatever shape the provider felt like
// producing; any absent level means "no citations", never an error. Order is
// preserved as relevance order, and duplicate URIs are passed through
// untouched.
pub fn extract_sources(reply: &ModelReply) -> Vec<Source> {
    let Some(metadata) = reply
        .candidates
        .first()
        .and_then(|candidate| candidate.grounding_metadata.as_ref())
    else {
        return Vec::new();
    };

    metadata
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| match (web.title.as_deref(), web.uri.as_deref()) {
            (Some(title), Some(uri)) if !title.is_empty() && !uri.is_empty() => Some(Source {
                title: title.to_string(),
                uri: uri.to_string(),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply_from(value: serde_json::Value) -> ModelReply {
        serde_json::from_value(value).expect("reply should deserialize")
    }

    #[test]
    fn absent_levels_yield_no_sources() {
        let shapes = [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{}] }),
            json!({ "candidates": [{ "groundingMetadata": {} }] }),
            json!({ "candidates": [{ "groundingMetadata": { "groundingChunks": [] } }] }),
            json!({ "candidates": [{ "groundingMetadata": { "groundingChunks": [{}] } }] }),
        ];

        for shape in shapes {
            assert!(extract_sources(&reply_from(shape)).is_empty());
        }
    }

    #[test]
    fn incomplete_web_records_are_dropped() {
        let reply = reply_from(json!({
            "candidates": [{
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://uaelegislation.gov.ae/en/law/1" } },
                        { "web": { "title": "Untitled uri" } },
                        { "web": { "uri": "", "title": "Blank uri" } },
                        { "web": { "uri": "https://moj.gov.ae/x", "title": "" } }
                    ]
                }
            }]
        }));

        assert!(extract_sources(&reply).is_empty());
    }

    #[test]
    fn valid_chunks_survive_in_provider_order() {
        let reply = reply_from(json!({
            "candidates": [{
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://uaelegislation.gov.ae/en/law/33", "title": "Labour Law" } },
                        { "web": { "title": "missing uri" } },
                        { "web": { "uri": "https://www.moj.gov.ae/ar/research/5", "title": "MOJ Research" } }
                    ]
                }
            }]
        }));

        let sources = extract_sources(&reply);
        assert_eq!(
            sources,
            vec![
                Source {
                    title: "Labour Law".to_string(),
                    uri: "https://uaelegislation.gov.ae/en/law/33".to_string(),
                },
                Source {
                    title: "MOJ Research".to_string(),
                    uri: "https://www.moj.gov.ae/ar/research/5".to_string(),
                },
            ]
        );
    }

    #[test]
    fn duplicate_uris_are_not_deduplicated() {
        let chunk = json!({
            "web": { "uri": "https://uaelegislation.gov.ae/en/law/8", "title": "Civil Code" }
        });
        let reply = reply_from(json!({
            "candidates": [{
                "groundingMetadata": { "groundingChunks": [chunk.clone(), chunk] }
            }]
        }));

        let sources = extract_sources(&reply);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0], sources[1]);
    }
}
