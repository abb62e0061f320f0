use crate::application::ports::figure_repository::FigureRepository;
use crate::domain::figures::figure::Figure;

pub struct FindFiguresByName<'a, R: FigureRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: FigureRepository + ?Sized> FindFiguresByName<'a, R> {
    /// Case-insensitive exact name lookup. `None` when nothing matches, so
    /// the caller can distinguish "no such figure" from an empty catalog slice.
    pub async fn execute(&self, name: &str) -> anyhow::Result<Option<Vec<Figure>>> {
        let figures = self.repo.find_by_name(name).await?;
        if figures.is_empty() {
            Ok(None)
        } else {
            Ok(Some(figures))
        }
    }
}
