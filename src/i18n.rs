//! Static translation table for interface text.
//!
//! Question content is translated server-side; this table only covers labels, toasts
//! and the onboarding guide.

use crate::models::Language;

/// Translatable interface strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    WelcomeTitle,
    WelcomeSubtitle,
    StartQuiz,
    BrowseQuestions,
    QuestionCounter,
    Score,
    CheckAnswer,
    NextQuestion,
    ShowHints,
    HideHints,
    AiHelper,
    KeyConcepts,
    ThinkAbout,
    RelatedTopics,
    HintWarning,
    Correct,
    Incorrect,
    CorrectAnswer,
    CorrectAnswers,
    Explanation,
    UploadJson,
    Statistics,
    TotalQuestions,
    AiVerified,
    TranslationsCount,
    Coverage,
    NoQuestions,
    PerPage,
    Prev,
    Next,
    NetworkError,
    RateLimited,
    UploadSuccess,
    UploadFailed,
    LoadingHints,
    HintsError,
    LanguageChanged,
    TranslationFailed,
    EmptyDeck,
    DiscardProgress,
    Results,
    StepByStep,
    Step1,
    Step2,
    Step3,
    Step4,
    Step1Desc,
    Step2Desc,
    Step3Desc,
    Step4Desc,
    UploadComplete,
    NewQuestions,
    Duplicates,
}

/// Look up `text` in `lang`.
pub fn t(lang: Language, text: Text) -> &'static str {
    match lang {
        Language::En => en(text),
        Language::Ru => ru(text),
    }
}

fn en(text: Text) -> &'static str {
    use Text::*;
    match text {
        WelcomeTitle => "Welcome to AWS Quiz!",
        WelcomeSubtitle => "Test your AWS Cloud Practitioner knowledge",
        StartQuiz => "Start Quiz",
        BrowseQuestions => "Browse Questions",
        QuestionCounter => "Question",
        Score => "Score",
        CheckAnswer => "Check Answer",
        NextQuestion => "Next Question",
        ShowHints => "Show Hints",
        HideHints => "Hide Hints",
        AiHelper => "AI Study Helper",
        KeyConcepts => "Key Concepts",
        ThinkAbout => "Think About",
        RelatedTopics => "Related Topics",
        HintWarning => "These are hints, not answers. Try to solve it yourself first!",
        Correct => "Correct!",
        Incorrect => "Incorrect",
        CorrectAnswer => "Correct answer",
        CorrectAnswers => "Correct answers",
        Explanation => "Explanation",
        UploadJson => "Upload Telegram JSON",
        Statistics => "Statistics",
        TotalQuestions => "Total Questions",
        AiVerified => "AI Verified",
        TranslationsCount => "Translations",
        Coverage => "Coverage",
        NoQuestions => "No questions found",
        PerPage => "per page",
        Prev => "Prev",
        Next => "Next",
        NetworkError => "Network error. Please try again.",
        RateLimited => "Too many requests. Please wait",
        UploadSuccess => "Questions uploaded successfully!",
        UploadFailed => "Upload failed. Please check the file format.",
        LoadingHints => "Loading hints...",
        HintsError => "Failed to load hints. Please try again.",
        LanguageChanged => "Language",
        TranslationFailed => "Translation failed. Please try again.",
        EmptyDeck => "No questions in this category",
        DiscardProgress => "Leave the quiz? Your answers will be lost.",
        Results => "Results",
        StepByStep => "Step-by-Step Guide",
        Step1 => "Open menu",
        Step2 => "Export chat",
        Step3 => "Select JSON",
        Step4 => "Upload file",
        Step1Desc => "Click the three dots in the top right corner of the chat",
        Step2Desc => "Choose \"Export chat history\"",
        Step3Desc => "Choose JSON format and uncheck all media options",
        Step4Desc => "Upload the result.json file",
        UploadComplete => "Upload Complete!",
        NewQuestions => "New Questions",
        Duplicates => "Duplicates",
    }
}

fn ru(text: Text) -> &'static str {
    use Text::*;
    match text {
        WelcomeTitle => "Добро пожаловать в AWS Quiz!",
        WelcomeSubtitle => "Проверьте свои знания AWS Cloud Practitioner",
        StartQuiz => "Начать тест",
        BrowseQuestions => "Просмотр вопросов",
        QuestionCounter => "Вопрос",
        Score => "Счёт",
        CheckAnswer => "Проверить ответ",
        NextQuestion => "Следующий вопрос",
        ShowHints => "Показать подсказки",
        HideHints => "Скрыть подсказки",
        AiHelper => "AI Помощник",
        KeyConcepts => "Ключевые концепции",
        ThinkAbout => "Подумайте о",
        RelatedTopics => "Связанные темы",
        HintWarning => "Это подсказки, а не ответы. Попробуйте решить самостоятельно!",
        Correct => "Правильно!",
        Incorrect => "Неправильно",
        CorrectAnswer => "Правильный ответ",
        CorrectAnswers => "Правильные ответы",
        Explanation => "Объяснение",
        UploadJson => "Загрузить Telegram JSON",
        Statistics => "Статистика",
        TotalQuestions => "Всего вопросов",
        AiVerified => "Проверено AI",
        TranslationsCount => "Переводов",
        Coverage => "Покрытие",
        NoQuestions => "Вопросы не найдены",
        PerPage => "на странице",
        Prev => "Назад",
        Next => "Вперёд",
        NetworkError => "Ошибка сети. Попробуйте снова.",
        RateLimited => "Слишком много запросов. Подождите",
        UploadSuccess => "Вопросы успешно загружены!",
        UploadFailed => "Загрузка не удалась. Проверьте формат файла.",
        LoadingHints => "Загрузка подсказок...",
        HintsError => "Не удалось загрузить подсказки. Попробуйте снова.",
        LanguageChanged => "Язык",
        TranslationFailed => "Перевод не удался. Попробуйте снова.",
        EmptyDeck => "В этой категории нет вопросов",
        DiscardProgress => "Выйти из теста? Ваши ответы будут потеряны.",
        Results => "Результаты",
        StepByStep => "Пошаговая инструкция",
        Step1 => "Открыть меню",
        Step2 => "Экспорт чата",
        Step3 => "Выбрать JSON",
        Step4 => "Загрузить файл",
        Step1Desc => "Кликните на три точки в правом верхнем углу чата",
        Step2Desc => "Выберите \"Экспорт истории чата\"",
        Step3Desc => "Выберите формат JSON и снимите галочки со всех медиа-опций",
        Step4Desc => "Загрузите файл result.json",
        UploadComplete => "Загрузка завершена!",
        NewQuestions => "Новых вопросов",
        Duplicates => "Дубликатов",
    }
}

/// Suffix appended to multi-select questions, e.g. `(Select 2)`.
pub fn select_label(lang: Language, count: usize) -> String {
    match lang {
        Language::En => format!("(Select {count})"),
        Language::Ru => format!("(Выбери {count})"),
    }
}

/// Progress hint for a partially filled multi-select answer.
pub fn selected_of(lang: Language, selected: usize, required: usize) -> String {
    match lang {
        Language::En => format!("Selected {selected} of {required}"),
        Language::Ru => format!("Выбрано {selected} из {required}"),
    }
}

/// Notice shown when a click evicted the oldest selected option.
pub fn only_select(lang: Language, count: usize) -> String {
    match lang {
        Language::En => format!("You can only select {count} answer(s)"),
        Language::Ru => format!("Можно выбрать только {count} ответ(ов)"),
    }
}

/// Closing message for the results screen.
pub fn results_message(lang: Language, percent: u32) -> &'static str {
    match (lang, percent) {
        (Language::En, 90..) => "Excellent! You know the material very well!",
        (Language::En, 70..) => "Good! But there is room to grow.",
        (Language::En, _) => "You should review the material.",
        (Language::Ru, 90..) => "Отлично! Вы прекрасно знаете материал!",
        (Language::Ru, 70..) => "Хорошо! Но есть куда расти.",
        (Language::Ru, _) => "Нужно повторить материал.",
    }
}
