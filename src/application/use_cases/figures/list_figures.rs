use crate::application::ports::figure_repository::FigureRepository;
use crate::domain::figures::figure::{Figure, Model};

#[derive(Debug, Default, Clone)]
pub struct ListFilter {
    /// Name prefix, matched case-sensitively like the catalog search always has.
    pub name: Option<String>,
    pub model: Option<Model>,
    pub year: Option<i32>,
}

pub struct ListFigures<'a, R: FigureRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: FigureRepository + ?Sized> ListFigures<'a, R> {
    pub async fn execute(&self, filter: ListFilter) -> anyhow::Result<Vec<Figure>> {
        let base = match (filter.model, filter.year) {
            (Some(model), _) => self.repo.find_by_model(model).await?,
            (None, Some(year)) => self.repo.find_by_release_year(year).await?,
            (None, None) => self.repo.list_all().await?,
        };
        let mut figures: Vec<Figure> = match filter.name {
            Some(prefix) => base
                .into_iter()
                .filter(|f| f.name.starts_with(&prefix))
                .collect(),
            None => base,
        };
        if let (Some(_), Some(year)) = (filter.model, filter.year) {
            use chrono::Datelike;
            figures.retain(|f| f.release_date.year() == year);
        }
        Ok(figures)
    }
}
