#[derive(Debug, Clone)]
pub enum Message {
    ToggleFit,
    Save,
}
