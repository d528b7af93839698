use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{DailyTip, NewTip, TipCategory};
use crate::services::AuthContext;
use crate::store::{DataStore, TipQuery};

pub const DEFAULT_DAILY_TIPS: usize = 3;
pub const MAX_DAILY_TIPS: usize = 50;
const PERSONALIZED_CATEGORIES: usize = 3;

#[derive(Validate)]
struct DailyTipsLimit {
    #[validate(range(min = 1, max = MAX_DAILY_TIPS))]
    limit: usize,
}

pub struct TipsService {
    store: Arc<dyn DataStore>,
}

impl TipsService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Latest active tips. An explicit limit must lie in `1..=MAX_DAILY_TIPS`.
    pub async fn daily_tips(&self, limit: Option<usize>) -> ServiceResult<Vec<DailyTip>> {
        let limit = DailyTipsLimit {
            limit: limit.unwrap_or(DEFAULT_DAILY_TIPS),
        };
        limit.validate()?;

        self.store
            .list_tips(&TipQuery {
                category: None,
                limit: Some(limit.limit),
            })
            .await
            .map_err(ServiceError::Persistence)
    }

    pub async fn tips_by_category(&self, category: TipCategory) -> ServiceResult<Vec<DailyTip>> {
        self.store
            .list_tips(&TipQuery {
                category: Some(category),
                limit: None,
            })
            .await
            .map_err(ServiceError::Persistence)
    }

    /// One tip from each of three randomly chosen categories. Categories
    /// without an active tip contribute nothing.
    pub async fn personalized_tips(&self) -> ServiceResult<Vec<DailyTip>> {
        let categories: Vec<TipCategory> = {
            let mut all = TipCategory::ALL.to_vec();
            all.shuffle(&mut rand::rng());
            all.truncate(PERSONALIZED_CATEGORIES);
            all
        };

        let mut tips = Vec::with_capacity(categories.len());
        for category in categories {
            let found = self
                .store
                .list_tips(&TipQuery {
                    category: Some(category),
                    limit: Some(1),
                })
                .await
                .map_err(ServiceError::Persistence)?;
            tips.extend(found);
        }
        Ok(tips)
    }

    pub async fn add_tip(&self, ctx: &AuthContext, req: NewTip) -> ServiceResult<DailyTip> {
        let admin_id = ctx.require_admin()?;
        req.validate()?;

        let tip = DailyTip {
            id: Uuid::new_v4().to_string(),
            category: req.category,
            title: req.title,
            content: req.content,
            difficulty_level: req.difficulty_level,
            is_active: req.is_active,
            created_at: Utc::now(),
        };

        self.store
            .insert_tip(&tip)
            .await
            .map_err(ServiceError::Persistence)?;
        tracing::info!(
            "Tip {} ({}) added by {}",
            tip.id,
            tip.category.as_str(),
            admin_id
        );

        Ok(tip)
    }
}
