use super::Language;

/// Display names of the persona slots for one language
#[derive(Debug, Clone, Copy)]
pub struct LocalizedNames {
    pub legacy: &'static str,
    pub neural: &'static str,
    pub boy: &'static str,
    pub girl: &'static str,
    pub robot: &'static str,
    pub utility: &'static str,
    pub young_boy: &'static str,
    pub young_girl: &'static str,
    pub narrator: &'static str,
    pub sophisticated: &'static str,
    pub man: &'static str,
    pub woman: &'static str,
    pub infinite: &'static str,
    pub preview: &'static str,
}

macro_rules! names {
    ($legacy:expr, $neural:expr, $boy:expr, $girl:expr, $robot:expr, $utility:expr,
     $yboy:expr, $ygirl:expr, $narrator:expr, $soph:expr, $man:expr, $woman:expr,
     $infinite:expr, $preview:expr) => {
        LocalizedNames {
            legacy: $legacy,
            neural: $neural,
            boy: $boy,
            girl: $girl,
            robot: $robot,
            utility: $utility,
            young_boy: $yboy,
            young_girl: $ygirl,
            narrator: $narrator,
            sophisticated: $soph,
            man: $man,
            woman: $woman,
            infinite: $infinite,
            preview: $preview,
        }
    };
}

/// Localized names for `language`
pub fn names_for(language: Language) -> &'static LocalizedNames {
    match language {
        Language::En => &EN,
        Language::Hi => &HI,
        Language::Mr => &MR,
        Language::Ne => &NE,
        Language::Bho => &BHO,
        Language::Ur => &UR,
        Language::Es => &ES,
        Language::Fr => &FR,
        Language::De => &DE,
        Language::Ja => &JA,
        Language::It => &IT,
        Language::Pt => &PT,
        Language::Ar => &AR,
        Language::Zh => &ZH,
        Language::Ko => &KO,
        Language::Ru => &RU,
        Language::Tr => &TR,
        Language::Nl => &NL,
        Language::Vi => &VI,
        Language::Th => &TH,
        Language::Sv => &SV,
        Language::Pl => &PL,
    }
}

const EN: LocalizedNames = names!(
    "English Crystal", "English Studio", "English Young Male", "English Young Female",
    "English Tech-Unit", "English Reader", "Oliver", "Sophia", "Alistair", "Victoria", "James",
    "Emma", "Nova Prime",
    "This is a sample of our high-quality studio voice in English."
);

const HI: LocalizedNames = names!(
    "हिंदी निर्मल", "हिंदी स्पष्ट", "हिंदी बालक", "हिंदी बालिका", "हिंदी यंत्र", "हिंदी सूचक",
    "आरव", "दिया", "कविता", "राजेश्वर", "अर्जुन", "प्रिया", "आत्मा",
    "यह हिंदी में हमारी उच्च गुणवत्ता वाली स्टूडियो आवाज का एक नमूना है।"
);

const MR: LocalizedNames = names!(
    "मराठी स्फटिक", "मराठी स्टुडिओ", "मराठी मुलगा", "मराठी मुलगी", "मराठी रोबोट", "मराठी वाचक",
    "आदित्य", "ईश्वरी", "निवेदक", "मीनाक्षी", "विनायक", "सायली", "अनंत",
    "हे मराठीतील आमच्या उच्च-गुणवत्तेच्या स्टुडिओ आवाजाचे उदाहरण आहे."
);

const NE: LocalizedNames = names!(
    "नेपाली निर्मल", "नेपाली स्पष्ट", "नेपाली केटो", "नेपाली केटी", "नेपाली यन्त्र", "नेपाली पाठक",
    "सन्देश", "प्रकृति", "वाचक", "लक्ष्मी", "राजेश", "बिनीता", "आलोक",
    "यो नेपालीमा हाम्रो उच्च गुणस्तरको स्टुडियो आवाजको नमूना हो।"
);

const BHO: LocalizedNames = names!(
    "भोजपुरी निर्मल", "भोजपुरी स्पष्ट", "भोजपुरी लइका", "भोजपुरी लइकी", "भोजपुरी मसीन",
    "भोजपुरी वाचक", "बबलू", "गुड़िया", "कथावाचक", "मुखिया जी", "बिरजू", "सुनैना", "पूर्णिमा",
    "ई हमनी के भोजपुरी के उच्च गुणवत्ता वाला स्टूडियो आवाज के नमूना ह।"
);

const UR: LocalizedNames = names!(
    "اردو شفاف", "اردو اسٹوڈیو", "اردو لڑکا", "اردو لڑکی", "اردو روبوٹ", "اردو قاری",
    "حمزہ", "زینب", "راوی", "سلطانہ", "اقبال", "پروین", "نور",
    "یہ اردو میں ہماری اعلیٰ معیار کی اسٹوڈیو آواز کا ایک نمونہ ہے۔"
);

const ES: LocalizedNames = names!(
    "Español Puro", "Español Estudio", "Español Joven", "Español Niña", "Español Androide",
    "Español Datos", "Hugo", "Valentina", "Narrador Real", "Isabella", "Alejandro", "Elena",
    "Esencia",
    "Esta es una muestra de nuestra voz de estudio de alta calidad en español."
);

const FR: LocalizedNames = names!(
    "Français Cristal", "Français Studio", "Français Garçon", "Français Fille",
    "Français Automate", "Français Flux", "Arthur", "Manon", "Le Conteur", "Camille", "Julien",
    "Sophie", "L'Infini",
    "Ceci est un échantillon de notre voix de studio de haute qualité en français."
);

const DE: LocalizedNames = names!(
    "Deutsch Kristall", "Deutsch Studio", "Deutsch Junge", "Deutsch Mädchen", "Deutsch Roboter",
    "Deutsch Leser", "Max", "Mia", "Erzähler", "Helga", "Klaus", "Greta", "Unendlichkeit",
    "Dies ist eine Probe unserer hochwertigen Studio-Stimme auf Deutsch."
);

const JA: LocalizedNames = names!(
    "日本語 透明", "日本語 クリア", "日本語 少年", "日本語 少女", "日本語 メカ", "日本語 情報",
    "ハルト", "アカリ", "語り部", "ケンジ", "ヒロシ", "ユキ", "無限",
    "これは日本語の高品質なスタジオ音声のサンプルです。"
);

const IT: LocalizedNames = names!(
    "Italiano Cristallo", "Italiano Studio", "Italiano Ragazzo", "Italiano Ragazza",
    "Italiano Robot", "Italiano Lettore", "Luca", "Giulia", "Narratore", "Francesca", "Marco",
    "Sofia", "Infinito",
    "Questo è un campione della nostra voce da studio di alta qualità in italiano."
);

const PT: LocalizedNames = names!(
    "Português Cristal", "Português Estúdio", "Português Menino", "Português Menina",
    "Português Robô", "Português Leitor", "João", "Maria", "Narrador", "Beatriz", "Ricardo",
    "Ana", "Infinito",
    "Este é um exemplo da nossa voz de estúdio de alta qualidade em português."
);

const AR: LocalizedNames = names!(
    "عربي كريستال", "عربي استوديو", "عربي ولد", "عربي بنت", "عربي آلي", "عربي قارئ",
    "يوسف", "ليلى", "الراوي", "فاطمة", "أحمد", "مريم", "نوفا",
    "هذه عينة من صوتنا الإستوديو عالي الجودة باللغة العربية."
);

const ZH: LocalizedNames = names!(
    "中文 水晶", "中文 工作室", "中文 男孩", "中文 女孩", "中文 机器人", "中文 阅读器",
    "小明", "小红", "旁白", "张先生", "李先生", "王女士", "无限",
    "这是我们中文高品质录音室声音的样本。"
);

const KO: LocalizedNames = names!(
    "한국어 크리스탈", "한국어 스튜디오", "한국어 소년", "한국어 소녀", "한국어 로봇",
    "한국어 낭독자", "민준", "서연", "성우", "지혜", "정우", "은지", "무한",
    "이것은 한국어 고품질 스튜디오 음성의 샘플입니다."
);

const RU: LocalizedNames = names!(
    "Русский Кристалл", "Русский Студия", "Русский Мальчик", "Русский Девочка",
    "Русский Робот", "Русский Чтец", "Иван", "Анна", "Диктор", "Елена", "Дмитрий", "Ольга",
    "Нова",
    "Это образец нашего высококачественного студийного голоса на русском языке."
);

const TR: LocalizedNames = names!(
    "Türkçe Kristal", "Türkçe Stüdyo", "Türkçe Erkek Çocuk", "Türkçe Kız Çocuk", "Türkçe Robot",
    "Türkçe Okuyucu", "Emre", "Zeynep", "Anlatıcı", "Selin", "Can", "Elif", "Sonsuz",
    "Bu, Türkçe yüksek kaliteli stüdyo sesimizin bir örneğidir."
);

const NL: LocalizedNames = names!(
    "Nederlands Kristal", "Nederlands Studio", "Nederlands Jongen", "Nederlands Meisje",
    "Nederlands Robot", "Nederlands Voorlezer", "Daan", "Sophie", "Verteller", "Emma", "Bram",
    "Lotte", "Nova",
    "Dit is een voorbeeld van onze hoogwaardige studiostem in het Nederlands."
);

const VI: LocalizedNames = names!(
    "Tiếng Việt Pha Lê", "Tiếng Việt Studio", "Tiếng Việt Con Trai", "Tiếng Việt Con Gái",
    "Tiếng Việt Robot", "Tiếng Việt Người Đọc", "Minh", "Linh", "Người kể chuyện", "Hương",
    "Tuấn", "Lan", "Vô tận",
    "Đây là mẫu giọng nói studio chất lượng cao của chúng tôi bằng tiếng Việt."
);

const TH: LocalizedNames = names!(
    "ไทย คริสตัล", "ไทย สตูดิโอ", "ไทย เด็กชาย", "ไทย เด็กหญิง", "ไทย หุ่นยนต์", "ไทย ผู้อ่าน",
    "ก้อง", "ฟ้า", "ผู้บรรยาย", "พิมพ์", "นที", "มะลิ", "โนวา",
    "นี่คือตัวอย่างเสียงสตูดิโอคุณภาพสูงของเราในภาษาไทย"
);

const SV: LocalizedNames = names!(
    "Svenska Kristall", "Svenska Studio", "Svenska Pojke", "Svenska Flicka", "Svenska Robot",
    "Svenska Uppläsare", "Oskar", "Alice", "Berättare", "Astrid", "Erik", "Maja", "Nova",
    "Detta är ett prov på vår högkvalitativa studioröst på svenska."
);

const PL: LocalizedNames = names!(
    "Polski Kryształ", "Polski Studio", "Polski Chłopiec", "Polski Dziewczynka", "Polski Robot",
    "Polski Lektor", "Kuba", "Zuzia", "Lektor", "Kasia", "Piotr", "Magda", "Nova",
    "To jest próbka naszego wysokiej jakości głosu studyjnego w języku polskim."
);
