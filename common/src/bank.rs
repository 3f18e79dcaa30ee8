use crate::{Category, CorrectPair, DragAndDrop, Question, QuestionKind, Scenario};

/// Ordered, immutable set of quiz questions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The six questions the game ships with.
    pub fn builtin() -> Self {
        Self::new(vec![
            question_1(),
            question_2(),
            question_3(),
            question_4(),
            question_5(),
            drag_and_drop_question(),
        ])
    }

    /// Single question used when no usable bank is available.
    pub fn fallback() -> Self {
        Self::new(vec![Question::multiple_choice(
            "fallback_1",
            "Apa jenis informasi yang paling tepat menggambarkan konten video tersebut?",
            "Video tersebut merupakan propaganda anti-vaksin yang menyebarkan informasi tidak akurat tentang vaksin.",
            strings(&[
                "Informasi medis yang akurat",
                "Propaganda anti-vaksin",
                "Edukasi kesehatan umum",
                "Iklan produk kesehatan",
            ]),
            1,
        )])
    }

    pub fn all_questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question_by_id(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn questions_by_kind(&self, kind: QuestionKind) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.kind() == kind)
            .collect()
    }

    pub fn validate_all(&self) -> bool {
        self.questions.iter().all(Question::is_valid)
    }

    /// Drops invalid questions; an empty result is replaced by the fallback bank.
    pub fn sanitized(self) -> Self {
        let questions: Vec<Question> = self
            .questions
            .into_iter()
            .filter(|question| match question.validation_error() {
                Some(reason) => {
                    log::warn!("excluding question `{}`: {}", question.id, reason);
                    false
                }
                None => true,
            })
            .collect();

        if questions.is_empty() {
            log::warn!("question bank is empty, using the fallback question");
            Self::fallback()
        } else {
            Self::new(questions)
        }
    }
}

fn strings(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|text| text.to_string()).collect()
}

fn question_1() -> Question {
    Question::multiple_choice(
        "Q001",
        "Sebuah akun publik membagikan ulang cuplikan video lama saat seorang dokter mengatakan bahwa \"vaksin tertentu masih dalam uji coba dan belum final.\" Potongan ini dipakai untuk memperkuat narasi anti-vaksin. Jenis informasi apa yang paling tepat menggambarkan konten tersebut?",
        "Potongan informasi disengaja disebar ulang tanpa konteks waktu untuk menciptakan efek menyesatkan, padahal sumber awalnya benar. Ini adalah disinformasi karena ada niat untuk menyesatkan dengan menghilangkan konteks penting.",
        strings(&[
            "Misinformasi – kontennya tidak sengaja menyesatkan karena diambil dari sumber asli",
            "Disinformasi – kontennya disengaja untuk menyesatkan, dengan menghilangkan konteks waktu",
            "Malinformasi – informasinya benar, tapi dibagikan dengan tujuan edukatif",
            "Disinformasi – kontennya salah dan tidak berasal dari sumber medis sama sekali",
        ]),
        1,
    )
}

fn question_2() -> Question {
    Question::multiple_choice(
        "Q002",
        "Sebuah berita viral mengklaim bahwa \"air rebusan sereh dan jeruk nipis terbukti membunuh virus COVID-19.\" Kamu menemukan ada 3 sumber: (A) Akun blog kesehatan pribadi, (B) Portal berita nasional tanpa referensi ilmiah, (C) Artikel jurnal kedokteran internasional. Apa langkah terbaik sesuai SIFT?",
        "Dalam kerangka SIFT, langkah tepat adalah 'trace claim' ke sumber primer yang kredibel, yaitu jurnal kedokteran. Popularitas atau opini publik bukan indikator kebenaran ilmiah.",
        strings(&[
            "Bandingkan ketiga sumber, lalu pilih yang paling meyakinkan dari bahasanya",
            "Menggunakan artikel yang paling banyak dishare sebagai yang paling sah",
            "Melacak ke jurnal kedokteran untuk melihat apakah ada studi pendukung",
            "Menanyakan ke grup WhatsApp dan pilih jawaban terbanyak",
        ]),
        2,
    )
}

fn question_3() -> Question {
    Question::multiple_choice(
        "Q003",
        "Seseorang membocorkan data pribadi pejabat publik yang valid, termasuk alamat rumah dan nama anak, lalu menambahkan caption bernada provokatif: \"Biar rakyat tahu siapa yang sebenarnya korup. Bagikan sebanyak mungkin!\" Jenis manipulasi digital apa yang sedang terjadi?",
        "Malinformasi = informasi yang benar tapi disebar dengan niat jahat atau tanpa etika, seperti doxing atau memprovokasi. Ini yang paling berbahaya secara moral karena melanggar privasi dan keamanan.",
        strings(&[
            "Disinformasi – informasi palsu tentang pejabat disebarkan untuk menipu",
            "Misinformasi – informasi benar tapi dibagikan secara keliru tanpa niat buruk",
            "Malinformasi – informasi valid yang digunakan untuk menyakiti atau menyerang",
            "Hoaks biasa – karena tidak ada unsur digital yang dimanipulasi",
        ]),
        2,
    )
}

fn question_4() -> Question {
    Question::multiple_choice(
        "Q004",
        "Sebuah akun TikTok sering membagikan \"fakta-fakta mengejutkan\" seputar konspirasi dunia. Profilnya tidak memuat identitas, dan klaimnya tidak pernah menyertakan sumber. Namun, akun itu punya jutaan follower dan videonya sering FYP. Apa yang paling tepat kamu lakukan sebelum mempercayai isi kontennya?",
        "Langkah \"Investigate the source\" dari SIFT meminta kita melihat riwayat dan reputasi digital sang pembuat konten. Followers banyak bukan jaminan kebenaran. Kredibilitas harus dievaluasi berdasarkan transparansi dan akurasi historis.",
        strings(&[
            "Langsung berhenti menonton karena pasti hoaks",
            "Telusuri kredibilitas akun dan cek apakah pernah dikoreksi oleh pemeriksa fakta",
            "Bagikan dulu, lalu klarifikasi kalau ternyata salah",
            "Anggap semua konspirasi menarik dan layak dipercaya sebagian",
        ]),
        1,
    )
}

fn question_5() -> Question {
    Question::multiple_choice(
        "Q005",
        "Sebuah meme menyebar luas berisi gambar seseorang yang tampak mabuk di jalanan, dengan caption: \"Beginilah kalau generasi milenial jadi pemimpin.\" Kamu melacak gambar tersebut ternyata dari video lawas tahun 2015 yang tidak ada kaitannya dengan politik. Mengapa menyebarkan meme seperti ini sangat berbahaya?",
        "Meme disinformasi visual seperti ini menggunakan gambar nyata dengan framing menyesatkan, yang bisa mencemarkan nama baik dan memperkuat stigma palsu. Ini melanggar etika digital karena mencampur fakta dan opini tanpa konteks yang tepat.",
        strings(&[
            "Karena bisa menurunkan elektabilitas generasi muda",
            "Karena kontennya lucu dan bisa disalahartikan sebagai humor",
            "Karena mencampur fakta dan opini tanpa konteks melanggar etika digital",
            "Karena tidak menyebutkan sumber gambar dan tidak menyebut tahun",
        ]),
        2,
    )
}

fn drag_and_drop_question() -> Question {
    Question::drag_and_drop(
        "Q006",
        "Identifikasi jenis manipulasi informasi dengan menyeret setiap skenario ke kategori yang benar.",
        "DISINFORMASI = informasi palsu yang sengaja disebarkan untuk menipu. \
         MISINFORMASI = informasi salah yang disebarkan tanpa niat jahat. \
         MALINFORMASI = informasi benar yang disebarkan dengan niat jahat atau tanpa etika.",
        DragAndDrop {
            scenarios: vec![
                Scenario::new(
                    "scenario_A",
                    "Scammer sengaja menyamar sebagai @genz.berdampak",
                )
                .with_detailed_info(
                    "Penyamaran identitas dengan tujuan menipu - ini adalah DISINFORMASI karena informasi palsu disebarkan dengan sengaja untuk menipu korban.",
                ),
                Scenario::new("scenario_B", "Aluna reshare tanpa cek keaslian").with_detailed_info(
                    "Penyebaran informasi salah tanpa verifikasi - ini adalah MISINFORMASI karena informasi salah disebarkan tanpa niat jahat, hanya kurang teliti.",
                ),
                Scenario::new(
                    "scenario_C",
                    "Kriminal mengancam menyalahgunakan data KTP asli Mbak Dyta",
                )
                .with_detailed_info(
                    "Penggunaan data valid untuk tujuan jahat - ini adalah MALINFORMASI karena informasi benar (data KTP asli) digunakan dengan niat jahat untuk mengancam.",
                ),
            ],
            categories: vec![
                Category::new("cat_disinformasi", "DISINFORMASI"),
                Category::new("cat_misinformasi", "MISINFORMASI"),
                Category::new("cat_malinformasi", "MALINFORMASI"),
            ],
            correct_pairs: vec![
                CorrectPair::new("scenario_A", "cat_disinformasi"),
                CorrectPair::new("scenario_B", "cat_misinformasi"),
                CorrectPair::new("scenario_C", "cat_malinformasi"),
            ],
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bank_ships_five_multiple_choice_and_one_drag_and_drop() {
        let bank = QuestionBank::builtin();

        assert_eq!(bank.len(), 6);
        assert_eq!(bank.questions_by_kind(QuestionKind::MultipleChoice).len(), 5);
        assert_eq!(bank.questions_by_kind(QuestionKind::DragAndDrop).len(), 1);
        assert_eq!(bank.all_questions()[5].id, "Q006");
    }

    #[test]
    fn every_builtin_question_is_valid() {
        let bank = QuestionBank::builtin();
        for question in bank.all_questions() {
            assert!(question.is_valid(), "{} is invalid", question.id);
        }
        assert!(bank.validate_all());
        assert!(QuestionBank::fallback().validate_all());
    }

    #[test]
    fn question_lookup_by_id() {
        let bank = QuestionBank::builtin();
        let question = bank.question_by_id("Q003").unwrap();
        assert_eq!(question.as_multiple_choice().unwrap().correct_index, 2);
        assert!(bank.question_by_id("Q999").is_none());
    }

    #[test]
    fn sanitized_drops_invalid_questions() {
        let mut questions = QuestionBank::builtin().into_questions();
        questions[0].prompt.clear();

        let bank = QuestionBank::new(questions).sanitized();

        assert_eq!(bank.len(), 5);
        assert!(bank.question_by_id("Q001").is_none());
    }

    #[test]
    fn sanitized_empty_bank_becomes_fallback() {
        let bank = QuestionBank::default().sanitized();
        assert_eq!(bank, QuestionBank::fallback());

        let broken = Question::multiple_choice("broken", "p", "e", vec![], 0);
        let bank = QuestionBank::new(vec![broken]).sanitized();
        assert_eq!(bank.all_questions()[0].id, "fallback_1");
    }
}
