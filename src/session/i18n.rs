//! Arabic and English labels, banners and error texts.
use crate::error::{DomainError, FormatError, MathError};
use crate::numerical::equation_solver::SolveMethod;
use crate::numerical::function_analysis::PointKind;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Locale {
    #[default]
    #[strum(to_string = "ar", serialize = "arabic", serialize = "العربية")]
    Arabic,
    #[strum(to_string = "en", serialize = "english")]
    English,
}

/// Everything the tool says to the user apart from errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Result(String),
    Solution(String),
    Plotted { function: String },
    Digitized { points: usize },
    HistoryCleared,
    HistoryTitle,
    HistoryEmpty,
    // explanation steps
    Operands { a: String, b: String, operation: String },
    Canonical(String),
    Residual(String),
    Degree(usize),
    Discriminant(String),
    Method(SolveMethod),
    RootCount(usize),
    Root { index: usize, value: String },
    AllValues,
    NoSolution,
    Derivative(String),
    SecondDerivative(String),
    Roots(String),
    CriticalPoint { kind: PointKind, x: String, y: String },
    InflectionPoint { x: String, y: String },
    MissingPoints(usize),
    // context of a failed action
    OperationFailed,
    InvalidEquation,
    InvalidFunction,
    DigitizeFailed,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Arabic => "ar",
            Locale::English => "en",
        }
    }

    /// right-to-left script
    pub fn is_rtl(&self) -> bool {
        matches!(self, Locale::Arabic)
    }

    fn method(&self, method: SolveMethod) -> &'static str {
        match (self, method) {
            (Locale::Arabic, SolveMethod::Evaluation) => "التعويض المباشر",
            (Locale::Arabic, SolveMethod::Linear) => "حل المعادلة الخطية",
            (Locale::Arabic, SolveMethod::QuadraticFormula) => "القانون العام للمعادلة التربيعية",
            (Locale::Arabic, SolveMethod::PolynomialIteration) => "طريقة دوراند-كيرنر التكرارية",
            (Locale::Arabic, SolveMethod::NumericBracketing) => "البحث العددي بالتنصيف",
            (Locale::English, SolveMethod::Evaluation) => "direct evaluation",
            (Locale::English, SolveMethod::Linear) => "linear equation",
            (Locale::English, SolveMethod::QuadraticFormula) => "quadratic formula",
            (Locale::English, SolveMethod::PolynomialIteration) => "Durand-Kerner iteration",
            (Locale::English, SolveMethod::NumericBracketing) => "numeric bracketing and bisection",
        }
    }

    fn point_kind(&self, kind: PointKind) -> &'static str {
        match (self, kind) {
            (Locale::Arabic, PointKind::Minimum) => "قيمة صغرى",
            (Locale::Arabic, PointKind::Maximum) => "قيمة عظمى",
            (Locale::Arabic, PointKind::Stationary) => "نقطة حرجة",
            (Locale::English, PointKind::Minimum) => "minimum",
            (Locale::English, PointKind::Maximum) => "maximum",
            (Locale::English, PointKind::Stationary) => "stationary point",
        }
    }

    pub fn message(&self, message: &Message) -> String {
        use Message::*;
        match self {
            Locale::Arabic => match message {
                Result(r) => format!("النتيجة = {}", r),
                Solution(s) => format!("الحل: {}", s),
                Plotted { function } => format!("تم رسم الدالة {}", function),
                Digitized { points } => format!("تمت رقمنة المنحنى من {} نقطة", points),
                HistoryCleared => "تم مسح السجل".to_string(),
                HistoryTitle => "السجل".to_string(),
                HistoryEmpty => "السجل فارغ".to_string(),
                Operands { a, b, operation } => {
                    format!("العملية: {} على العددين {} و {}", operation, a, b)
                }
                Canonical(c) => format!("الصيغة القياسية: {}", c),
                Residual(r) => format!("ننقل كل الحدود إلى طرف واحد: {} = 0", r),
                Degree(d) => format!("درجة المعادلة: {}", d),
                Discriminant(d) => format!("المميز: {}", d),
                Method(m) => format!("طريقة الحل: {}", self.method(*m)),
                RootCount(n) => format!("عدد الحلول: {}", n),
                Root { index, value } => format!("الحل رقم {}: {}", index, value),
                AllValues => "المعادلة صحيحة لكل القيم".to_string(),
                NoSolution => "لا يوجد حل".to_string(),
                Derivative(d) => format!("المشتقة الأولى: {}", d),
                SecondDerivative(d) => format!("المشتقة الثانية: {}", d),
                Roots(r) => format!("نقاط التقاطع مع محور السينات: {}", r),
                CriticalPoint { kind, x, y } => {
                    format!("{} عند ({}, {})", self.point_kind(*kind), x, y)
                }
                InflectionPoint { x, y } => format!("نقطة انعطاف عند ({}, {})", x, y),
                MissingPoints(n) => format!("{} نقطة خارج مجال تعريف الدالة", n),
                OperationFailed => "خطأ في العملية".to_string(),
                InvalidEquation => "صيغة المعادلة غير صحيحة".to_string(),
                InvalidFunction => "خطأ في الدالة".to_string(),
                DigitizeFailed => "تعذرت رقمنة الرسم".to_string(),
            },
            Locale::English => match message {
                Result(r) => format!("Result = {}", r),
                Solution(s) => format!("Solution: {}", s),
                Plotted { function } => format!("Plotted {}", function),
                Digitized { points } => format!("Curve digitized from {} points", points),
                HistoryCleared => "History cleared".to_string(),
                HistoryTitle => "History".to_string(),
                HistoryEmpty => "History is empty".to_string(),
                Operands { a, b, operation } => format!("{} {} and {}", operation, a, b),
                Canonical(c) => format!("Canonical form: {}", c),
                Residual(r) => format!("Moving every term to one side: {} = 0", r),
                Degree(d) => format!("Degree: {}", d),
                Discriminant(d) => format!("Discriminant: {}", d),
                Method(m) => format!("Method: {}", self.method(*m)),
                RootCount(n) => format!("Number of solutions: {}", n),
                Root { index, value } => format!("Solution {}: {}", index, value),
                AllValues => "The equation holds for every value".to_string(),
                NoSolution => "No solution".to_string(),
                Derivative(d) => format!("First derivative: {}", d),
                SecondDerivative(d) => format!("Second derivative: {}", d),
                Roots(r) => format!("x-intercepts: {}", r),
                CriticalPoint { kind, x, y } => {
                    format!("{} at ({}, {})", self.point_kind(*kind), x, y)
                }
                InflectionPoint { x, y } => format!("inflection point at ({}, {})", x, y),
                MissingPoints(n) => format!("{} points outside the domain of the function", n),
                OperationFailed => "Operation failed".to_string(),
                InvalidEquation => "Invalid equation format".to_string(),
                InvalidFunction => "Invalid function".to_string(),
                DigitizeFailed => "The drawing could not be digitized".to_string(),
            },
        }
    }

    /// Localized description of an error, without the action it interrupted.
    pub fn error(&self, error: &MathError) -> String {
        match self {
            Locale::English => match error {
                MathError::Format(e) => e.to_string(),
                MathError::Domain(e) => e.to_string(),
                MathError::Unsupported(msg) => format!("unsupported: {}", msg),
                MathError::Io(msg) => format!("file error: {}", msg),
            },
            Locale::Arabic => match error {
                MathError::Format(e) => match e {
                    FormatError::EmptyInput => "المدخل فارغ".to_string(),
                    FormatError::MissingEquals => "المعادلة يجب أن تحتوي على =".to_string(),
                    FormatError::MultipleEquals(n) => {
                        format!("المعادلة يجب أن تحتوي على = واحدة فقط، وُجدت {}", n)
                    }
                    FormatError::UnbalancedParentheses { position } => {
                        format!("أقواس غير متوازنة عند الموضع {}", position)
                    }
                    FormatError::UnknownFunction { name } => format!("دالة غير معروفة '{}'", name),
                    FormatError::MissingArgument { name } => {
                        format!("الدالة '{}' تحتاج إلى وسيط بين قوسين", name)
                    }
                    FormatError::UnexpectedInput { position, found } => {
                        format!("مدخل غير متوقع '{}' عند الموضع {}", found, position)
                    }
                    FormatError::InvalidNumber(s) => format!("'{}' ليس رقمًا", s),
                    FormatError::UnknownOperation(s) => format!("عملية غير معروفة '{}'", s),
                    FormatError::InvalidSetting { key, reason } => {
                        format!("إعداد غير صالح '{}': {}", key, reason)
                    }
                },
                MathError::Domain(e) => match e {
                    DomainError::DivisionByZero => "لا يمكن القسمة على صفر".to_string(),
                    DomainError::InvalidRange { start, end } => {
                        format!("مجال غير صالح [{}, {}]", start, end)
                    }
                    DomainError::NotEnoughPoints { needed, got } => {
                        format!("يلزم {} نقاط على الأقل، وُجد {}", needed, got)
                    }
                    DomainError::TooManyPoints { max, got } => {
                        format!("يمكن حساب {} نقطة على الأكثر، طُلب {}", max, got)
                    }
                    DomainError::PixelBufferSize {
                        width,
                        height,
                        channels,
                        len,
                    } => format!(
                        "حجم الصورة {}x{}x{} لا يطابق {} بايت",
                        width, height, channels, len
                    ),
                },
                MathError::Unsupported(msg) => format!("عملية غير مدعومة: {}", msg),
                MathError::Io(msg) => format!("خطأ في الملفات: {}", msg),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::default(), Locale::Arabic);
        assert_eq!(Locale::from_str("ar").unwrap(), Locale::Arabic);
        assert_eq!(Locale::from_str("EN").unwrap(), Locale::English);
        assert_eq!(Locale::from_str("العربية").unwrap(), Locale::Arabic);
        assert!(Locale::from_str("fr").is_err());
        for locale in Locale::iter() {
            assert_eq!(locale.to_string(), locale.code());
        }
        assert!(Locale::Arabic.is_rtl());
    }

    #[test]
    fn test_arabic_banners() {
        let ar = Locale::Arabic;
        assert_eq!(ar.message(&Message::Result("5".into())), "النتيجة = 5");
        assert_eq!(ar.message(&Message::Solution("[2, 3]".into())), "الحل: [2, 3]");
        assert_eq!(ar.message(&Message::InvalidEquation), "صيغة المعادلة غير صحيحة");
        assert_eq!(ar.message(&Message::InvalidFunction), "خطأ في الدالة");
        assert_eq!(
            ar.error(&MathError::Domain(DomainError::DivisionByZero)),
            "لا يمكن القسمة على صفر"
        );
    }

    #[test]
    fn test_english_errors_reuse_descriptions() {
        let en = Locale::English;
        assert_eq!(
            en.error(&MathError::Format(FormatError::MissingEquals)),
            "equation must contain '='"
        );
        assert_eq!(
            en.message(&Message::Method(SolveMethod::QuadraticFormula)),
            "Method: quadratic formula"
        );
    }
}
