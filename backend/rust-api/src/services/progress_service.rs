use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Profile, ProgressReport, RecentTest, SectionScores, SessionStatus, Skill, StudyStats,
    TestSession,
};
use crate::scoring::round1;
use crate::services::AuthContext;
use crate::store::{DataStore, SessionOrder, SessionQuery};

/// Below this average a skill is reported as weak.
pub const WEAK_THRESHOLD: f64 = 6.5;
pub const RECENT_TESTS_LIMIT: usize = 10;
pub const SCORES_PER_SKILL: usize = 5;

const RECOMMENDATION_ORDER: [Skill; 4] = [
    Skill::Writing,
    Skill::Speaking,
    Skill::Reading,
    Skill::Listening,
];

pub struct ProgressService {
    store: Arc<dyn DataStore>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn get_user_progress(&self, ctx: &AuthContext) -> ServiceResult<ProgressReport> {
        let user_id = ctx.require_user()?;

        let profile = self
            .store
            .find_profile(user_id)
            .await
            .map_err(ServiceError::Persistence)?;
        if profile.is_none() {
            tracing::debug!("No profile for {}, study stats default to zero", user_id);
        }

        let completed = self
            .store
            .list_sessions(&SessionQuery {
                user_id: user_id.to_string(),
                status: Some(SessionStatus::Completed),
                order_by: SessionOrder::CompletedAt,
                limit: Some(RECENT_TESTS_LIMIT),
            })
            .await
            .map_err(ServiceError::Persistence)?;

        let mut section_scores = SectionScores::default();
        for skill in Skill::ALL {
            let bands = self
                .store
                .recent_band_scores(user_id, skill, SCORES_PER_SKILL)
                .await
                .map_err(ServiceError::Persistence)?;
            section_scores.set(skill, calculate_average(&bands));
        }

        let overall_score = calculate_average(&[
            section_scores.writing,
            section_scores.reading,
            section_scores.speaking,
            section_scores.listening,
        ]);
        let weak_areas = identify_weak_areas(&section_scores);
        let recommendations = generate_recommendations(&weak_areas);

        tracing::debug!(
            "Progress for {}: overall {}, weak {:?}",
            user_id,
            overall_score,
            weak_areas
        );

        Ok(ProgressReport {
            overall_score,
            section_scores,
            recent_tests: completed.iter().map(recent_test).collect(),
            study_stats: study_stats(profile.as_ref(), overall_score),
            weak_areas,
            recommendations,
        })
    }
}

/// Counters and baseline come from the profile; without one they are zero.
fn study_stats(profile: Option<&Profile>, overall_score: f64) -> StudyStats {
    match profile {
        Some(profile) => StudyStats {
            total_hours: profile.total_study_hours,
            tests_completed: profile.tests_completed,
            current_streak: profile.current_streak,
            improvement: improvement_percent(overall_score, profile.current_score),
        },
        None => StudyStats {
            total_hours: 0.0,
            tests_completed: 0,
            current_streak: 0,
            improvement: 0,
        },
    }
}

fn recent_test(session: &TestSession) -> RecentTest {
    RecentTest {
        date: session.completed_at.unwrap_or(session.created_at),
        test_type: session.test_type,
        score: session.overall_score.unwrap_or(0.0),
    }
}

/// Mean of the positive values, rounded to one decimal. No positive values
/// gives 0.
pub fn calculate_average(scores: &[f64]) -> f64 {
    let valid: Vec<f64> = scores.iter().copied().filter(|s| *s > 0.0).collect();
    if valid.is_empty() {
        return 0.0;
    }
    round1(valid.iter().sum::<f64>() / valid.len() as f64)
}

/// Skills averaging below [`WEAK_THRESHOLD`], including skills with no data.
pub fn identify_weak_areas(scores: &SectionScores) -> Vec<Skill> {
    Skill::ALL
        .into_iter()
        .filter(|skill| scores.get(*skill) < WEAK_THRESHOLD)
        .collect()
}

pub fn generate_recommendations(weak_areas: &[Skill]) -> Vec<String> {
    let mut recommendations: Vec<String> = RECOMMENDATION_ORDER
        .iter()
        .filter(|skill| weak_areas.contains(skill))
        .flat_map(|skill| recommendations_for(*skill))
        .map(str::to_string)
        .collect();

    if recommendations.is_empty() {
        recommendations = vec![
            "Continue practicing all sections regularly".to_string(),
            "Take full mock exams weekly".to_string(),
        ];
    }
    recommendations
}

fn recommendations_for(skill: Skill) -> [&'static str; 2] {
    match skill {
        Skill::Writing => [
            "Practice essay structure and coherence",
            "Expand academic vocabulary",
        ],
        Skill::Speaking => [
            "Record daily speaking practice",
            "Work on pronunciation and fluency",
        ],
        Skill::Reading => [
            "Practice skimming and scanning techniques",
            "Build reading speed and comprehension",
        ],
        Skill::Listening => [
            "Listen to various English accents daily",
            "Practice note-taking while listening",
        ],
    }
}

/// Whole-percent change of `overall` against the profile baseline.
pub fn improvement_percent(overall: f64, baseline: f64) -> i64 {
    if baseline <= 0.0 || overall <= 0.0 {
        return 0;
    }
    ((overall - baseline) / baseline * 100.0).round() as i64
}
