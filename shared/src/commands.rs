use crate::domain::DrawRequest;

#[derive(Clone, Debug)]
pub enum Commands {
    Invalidate(DrawRequest),
    Destroy,
}
