use chrono::{DateTime, Utc};
use entity::{reviews, users};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Reviewer's display name
    #[schema(example = "Jane D.")]
    pub user_name: Option<String>,
    pub product_id: Uuid,
    #[schema(minimum = 1, maximum = 5, example = 4)]
    pub rating: i32,
    pub comment: Option<String>,
    /// The reviewer bought and received the product
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review row with its author
#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub review: reviews::Model,
    pub author: Option<users::Model>,
}

impl From<ReviewRecord> for Review {
    fn from(record: ReviewRecord) -> Self {
        let ReviewRecord { review, author } = record;
        Self {
            id: review.id,
            user_id: review.user_id,
            user_name: author.map(|u| short_name(&u.first_name, &u.last_name)),
            product_id: review.product_id,
            rating: review.rating,
            comment: review.comment,
            is_verified: review.is_verified,
            created_at: review.created_at.with_timezone(&Utc),
            updated_at: review.updated_at.with_timezone(&Utc),
        }
    }
}

/// "Jane D." style name shown next to public reviews
fn short_name(first: &str, last: &str) -> String {
    match last.chars().next() {
        Some(initial) => format!("{} {}.", first, initial.to_uppercase()),
        None => first.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// A review row ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewQuery {
    pub product_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    #[serde(default)]
    #[validate(range(max = 100_000_000))]
    pub offset: u64,
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            product_id: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> u64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Jane", "doe"), "Jane D.");
        assert_eq!(short_name("Cher", ""), "Cher");
    }

    #[test]
    fn test_rating_bounds() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let input: CreateReview = serde_json::from_value(json!({
                "product_id": Uuid::new_v4(),
                "rating": rating
            }))
            .unwrap();
            assert_eq!(input.validate().is_ok(), ok, "rating {rating}");
        }
    }

    #[test]
    fn test_comment_length() {
        let input = UpdateReview {
            comment: Some("x".repeat(2001)),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_query_defaults() {
        let query: ReviewQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
        assert!(query.product_id.is_none());
    }

    #[test]
    fn test_query_offset_bounded() {
        let query = ReviewQuery {
            offset: 100_000_001,
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }
}
