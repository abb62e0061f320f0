use std::collections::BTreeMap;

use crate::application::ports::figure_repository::FigureRepository;
use crate::domain::figures::figure::Figure;

#[derive(Debug, Clone)]
pub struct Stats {
    pub total: usize,
    pub most_expensive: Option<Figure>,
    pub average_price: Option<f64>,
    pub count_by_model: BTreeMap<String, i64>,
}

pub struct CatalogStats<'a, R: FigureRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: FigureRepository + ?Sized> CatalogStats<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Stats> {
        let figures = self.repo.list_all().await?;
        let total = figures.len();
        let most_expensive = figures
            .iter()
            .cloned()
            .max_by(|a, b| a.price.total_cmp(&b.price));
        let average_price = if total > 0 {
            Some(figures.iter().map(|f| f.price).sum::<f64>() / total as f64)
        } else {
            None
        };
        let mut count_by_model: BTreeMap<String, i64> = BTreeMap::new();
        for figure in &figures {
            *count_by_model
                .entry(figure.model.as_str().to_string())
                .or_insert(0) += 1;
        }
        Ok(Stats {
            total,
            most_expensive,
            average_price,
            count_by_model,
        })
    }
}
