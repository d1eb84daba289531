//! Instruction prompts for the extraction and adjudication stages

use crate::domain::{ScoredClause, StructuredQuery};

/// Placeholder rendered when retrieval produced no evidence
pub const NO_CLAUSES: &str = "(no clauses retrieved)";

/// Prompt asking the model to pull the five query fields out of free text
pub fn extraction_prompt(query: &str) -> String {
    format!(
        r#"Extract the following fields from the insurance query below and answer with a single JSON object.
Fields: age (number), gender ("male" or "female"), procedure (string), location (string), policy_duration (string).
Use null for any field the query does not mention. Do not add other keys or any commentary.

Example
Query: "46-year-old male, knee surgery in Pune, 3-month-old insurance policy"
Answer: {{"age": 46, "gender": "male", "procedure": "knee surgery", "location": "Pune", "policy_duration": "3 months"}}

Query: "{query}"
Answer:"#
    )
}

/// Render evidence as numbered `CLAUSE_i (dataset / ref): excerpt` blocks
pub fn render_clauses(evidence: &[ScoredClause]) -> String {
    if evidence.is_empty() {
        return NO_CLAUSES.to_string();
    }

    evidence
        .iter()
        .enumerate()
        .map(|(i, clause)| {
            format!(
                "CLAUSE_{} ({} / {}): {}",
                i + 1,
                clause.dataset,
                clause.clause_ref,
                clause.excerpt.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prompt asking the model for a grounded decision over the evidence
pub fn adjudication_prompt(query: &StructuredQuery, evidence: &[ScoredClause]) -> String {
    let parsed_query = serde_json::to_string(query).unwrap_or_else(|_| "{}".to_string());
    let clauses = render_clauses(evidence);

    format!(
        r#"You are an insurance claim adjudicator. Decide the claim using only the policy clauses provided.

Claim details:
{parsed_query}

Policy clauses:
{clauses}

Respond with a single JSON object with exactly these top-level keys:
- "parsed_query": the claim details above, echoed unchanged
- "decision": an object with "status" ("Approved", "Rejected" or "Pending"), "amount" (string or null) and "justification"
- "clauses_used": an array of the clauses you relied on, each with "dataset", "clause_ref" and "excerpt"

The justification must be 3 to 5 sentences and must reference the clauses by number (for example CLAUSE_1).
Return only the JSON object."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    fn clause(dataset: &str, clause_ref: &str, excerpt: &str) -> ScoredClause {
        ScoredClause {
            dataset: dataset.into(),
            clause_ref: clause_ref.into(),
            excerpt: excerpt.into(),
            score: 0.5,
        }
    }

    #[test]
    fn test_extraction_prompt_names_fields_and_query() {
        let prompt = extraction_prompt("knee surgery in Pune");

        for field in StructuredQuery::FIELDS {
            assert!(prompt.contains(field), "missing field {field}");
        }
        assert!(prompt.contains("Query: \"knee surgery in Pune\""));
        assert!(!prompt.contains("CLAUSE_"));
    }

    #[test]
    fn test_render_clauses_numbers_in_order() {
        let rendered = render_clauses(&[
            clause("policy.pdf", "policy.pdf_4", "  Knee surgery is excluded. "),
            clause("terms.pdf", "terms.pdf_0", "Waiting period of 24 months."),
        ]);

        assert_eq!(
            rendered,
            "CLAUSE_1 (policy.pdf / policy.pdf_4): Knee surgery is excluded.\n\n\
             CLAUSE_2 (terms.pdf / terms.pdf_0): Waiting period of 24 months."
        );
    }

    #[test]
    fn test_render_clauses_empty() {
        assert_eq!(render_clauses(&[]), NO_CLAUSES);
    }

    #[test]
    fn test_adjudication_prompt_embeds_query_and_clauses() {
        let query = StructuredQuery {
            age: Some(46),
            gender: Some(Gender::Male),
            ..StructuredQuery::default()
        };
        let prompt = adjudication_prompt(&query, &[clause("p", "p_1", "Covered procedures")]);

        assert!(prompt.contains(
            r#"{"age":46,"gender":"male","procedure":null,"location":null,"policy_duration":null}"#
        ));
        assert!(prompt.contains("CLAUSE_1 (p / p_1): Covered procedures"));
        assert!(prompt.contains("3 to 5 sentences"));
        assert!(!prompt.contains("Extract the following fields"));
    }
}
