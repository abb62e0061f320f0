use uuid::Uuid;

use crate::application::ports::figure_cache::FigureCache;
use crate::application::ports::figure_repository::FigureRepository;
use crate::domain::figures::figure::Figure;

pub struct GetFigure<'a, R, C>
where
    R: FigureRepository + ?Sized,
    C: FigureCache + ?Sized,
{
    pub repo: &'a R,
    pub cache: &'a C,
}

impl<'a, R, C> GetFigure<'a, R, C>
where
    R: FigureRepository + ?Sized,
    C: FigureCache + ?Sized,
{
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Figure>> {
        if let Some(hit) = self.cache.get(id).await {
            return Ok(Some(hit));
        }
        match self.repo.find_by_id(id).await? {
            Some(figure) => {
                self.cache.put(figure.clone()).await;
                Ok(Some(figure))
            }
            None => Ok(None),
        }
    }
}
