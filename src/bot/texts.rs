// User-facing messages

pub const GREETING: &str = "👋 Привет! Я Board AI Bot — мультиагентный совет директоров для \
                            бизнес-идей. Нажми кнопку «Новый анализ» или отправь команду /new, \
                            чтобы начать.";
pub const ASK_FOR_IDEA: &str =
    "Опишите бизнес-идею подробно. Я запущу экспертный совет (займет 3-5 мин).";
pub const CANCELLED: &str = "Действие отменено.";
pub const UNKNOWN_COMMAND: &str = "Неизвестная команда. /new - новый анализ.";
pub const PRESS_NEW_ANALYSIS: &str = "Нажмите кнопку «Новый анализ», чтобы начать.";

pub const ALREADY_PROCESSING: &str = "Анализ уже идет, пожалуйста, подождите.";
pub const ANALYSIS_STARTED: &str =
    "⏳ Анализ запущен. Я пришлю результат, как только эксперты закончат...";
pub const ANALYSIS_FAILED: &str = "⚠️ Ошибка анализа. Попробуйте позже.";

pub const NOTHING_TO_SAVE: &str = "Нет последнего анализа для сохранения. Сначала запусти анализ.";
pub const SAVE_FAILED: &str = "Не удалось сохранить анализ в базу данных.";
pub const SAVED: &str = "Анализ успешно сохранен в базу данных ✅";

pub const HISTORY_FAILED: &str = "Не удалось получить историю анализов.";
pub const HISTORY_EMPTY: &str = "История пуста. Сначала проведи анализ новой идеи.";
pub const HISTORY_HEADER: &str = "Последние анализы:";

pub const BUTTON_NEW_ANALYSIS: &str = "🆕 Новый анализ";
pub const BUTTON_SAVE_ANALYSIS: &str = "💾 Сохранить анализ";
pub const BUTTON_LIST_HISTORY: &str = "📜 Мои анализы";

/// Typed or reply-keyboard labels that start a new analysis
pub const NEW_ANALYSIS_LABELS: [&str; 3] = ["Новый анализ", "🔄 Новый анализ", BUTTON_NEW_ANALYSIS];

/// Typed or reply-keyboard labels that show history
pub const HISTORY_LABELS: [&str; 3] = ["Мои анализы", "📋 Мои анализы", BUTTON_LIST_HISTORY];
