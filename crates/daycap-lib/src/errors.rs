use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The Display text is the user-facing guidance, ready to print as-is.
    #[error("Валюта \"{requested}\" не поддерживается. Введите одну из доступных валют: {}", available.join("/"))]
    InvalidCurrency {
        requested: String,
        available: Vec<String>,
    },

    #[error("не удалось разобрать дату \"{input}\": ожидается формат дд.мм.гггг")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Rates(#[from] anyhow::Error),
}
