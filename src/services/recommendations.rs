use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;

use crate::{
    error::AppResult,
    models::{MovieId, Recommendation, RecommendationOptions},
    services::{
        candidates::gather_candidates,
        catalog::CatalogClient,
        ranking::{build_reason, score_and_rank, GenreNames},
        session::Session,
        taste::derive_top_genres,
    },
};

/// Reason attached to every popularity fallback pick
pub const POPULAR_REASON: &str = "Popular right now";

/// Entry point for personalized recommendations
///
/// Pipeline: taste profile → candidate discovery → scoring and ranking → reasons.
/// Users without any taste signal get currently popular movies instead.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogClient>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogClient> {
        &self.catalog
    }

    /// Ranked, explained recommendations for the session's active user
    ///
    /// Catalog failures are returned unchanged; nothing is retried.
    #[instrument(skip(self, session), fields(user_id = session.active_user().unwrap_or("none")))]
    pub async fn get_recommendations(
        &self,
        session: &Session,
        options: RecommendationOptions,
    ) -> AppResult<Vec<Recommendation>> {
        let profile = session.profile().await?;
        let watched_ids = profile.watched_ids();

        let top_genres = derive_top_genres(&profile.watch_history, &profile.preferences);
        if top_genres.is_empty() {
            tracing::info!("No taste signal, falling back to popular movies");
            return self.popular_fallback(&watched_ids, options.limit).await;
        }

        let candidates = gather_candidates(
            self.catalog.as_ref(),
            &top_genres,
            options.min_rating,
            options.min_vote_count,
        )
        .await?;
        let candidate_count = candidates.len();

        let ranked = score_and_rank(candidates, &top_genres, &watched_ids, options.limit);

        let names = GenreNames::new(&self.catalog.list_genres().await?);
        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .map(|(movie, _score)| {
                let reason = build_reason(&movie, &top_genres, &names);
                Recommendation::from_summary(movie, reason)
            })
            .collect();

        tracing::info!(
            top_genres = ?top_genres,
            candidates = candidate_count,
            returned = recommendations.len(),
            "Recommendations ranked"
        );

        Ok(recommendations)
    }

    /// Popular movies minus already-watched ones
    async fn popular_fallback(
        &self,
        watched_ids: &HashSet<MovieId>,
        limit: usize,
    ) -> AppResult<Vec<Recommendation>> {
        let popular = self.catalog.popular(1).await?;

        let recommendations: Vec<Recommendation> = popular
            .results
            .into_iter()
            .filter(|movie| !watched_ids.contains(&movie.id))
            .take(limit)
            .map(|movie| Recommendation::from_summary(movie, POPULAR_REASON.to_string()))
            .collect();

        tracing::info!(returned = recommendations.len(), "Popular fallback served");
        Ok(recommendations)
    }
}
