//! Skill vocabulary. The controlled set of skill phrases the requirement
//! extractor looks for, plus the alias table that maps short forms back to
//! a canonical key.
//!
//! Keys are lowercase; `display` is the label surfaced to callers.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub key: &'static str,
    pub display: &'static str,
}

const fn sub(key: &'static str, display: &'static str) -> VocabularyEntry {
    VocabularyEntry { key, display }
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in tables
// ────────────────────────────────────────────────────────────────────────────

const TECHNICAL_SKILLS: &[VocabularyEntry] = &[
    sub("python", "Python"),
    sub("javascript", "JavaScript"),
    sub("java", "Java"),
    sub("c++", "C++"),
    sub("c#", "C#"),
    sub("go", "Go"),
    sub("rust", "Rust"),
    sub("php", "PHP"),
    sub("ruby", "Ruby"),
    sub("swift", "Swift"),
    sub("html", "HTML"),
    sub("css", "CSS"),
    sub("sass", "Sass"),
    sub("less", "Less"),
    sub("typescript", "TypeScript"),
    sub("jsx", "JSX"),
    sub("react", "React"),
    sub("angular", "Angular"),
    sub("vue", "Vue"),
    sub("svelte", "Svelte"),
    sub("nodejs", "Node.js"),
    sub("expressjs", "Express.js"),
    sub("fastapi", "FastAPI"),
    sub("django", "Django"),
    sub("flask", "Flask"),
    sub("spring boot", "Spring Boot"),
    sub("laravel", "Laravel"),
    sub("rails", "Rails"),
    sub("sql", "SQL"),
    sub("mysql", "MySQL"),
    sub("postgresql", "PostgreSQL"),
    sub("mongodb", "MongoDB"),
    sub("redis", "Redis"),
    sub("elasticsearch", "Elasticsearch"),
    sub("oracle database", "Oracle Database"),
    sub("docker", "Docker"),
    sub("kubernetes", "Kubernetes"),
    sub("aws", "AWS"),
    sub("azure", "Azure"),
    sub("google cloud", "Google Cloud"),
    sub("git", "Git"),
    sub("linux", "Linux"),
    sub("unix", "Unix"),
    sub("bash", "Bash"),
    sub("powershell", "PowerShell"),
    sub("machine learning", "Machine Learning"),
    sub("artificial intelligence", "Artificial Intelligence"),
    sub("deep learning", "Deep Learning"),
    sub("data science", "Data Science"),
    sub("pandas", "Pandas"),
    sub("numpy", "NumPy"),
    sub("matplotlib", "Matplotlib"),
    sub("scikit-learn", "Scikit-learn"),
    sub("pytorch", "PyTorch"),
    sub("tensorflow", "TensorFlow"),
    sub("katalon", "Katalon"),
    sub("selenium", "Selenium"),
    sub("rest api", "REST API"),
    sub("graphql", "GraphQL"),
    sub("microservices", "Microservices"),
    sub("devops", "DevOps"),
    sub("ci/cd", "CI/CD"),
    sub("jenkins", "Jenkins"),
    sub("terraform", "Terraform"),
    sub("ansible", "Ansible"),
    sub("chef", "Chef"),
    sub("puppet", "Puppet"),
    sub("containerization", "Containerization"),
    sub("cloud computing", "Cloud Computing"),
    sub("cyber security", "Cyber Security"),
    sub("blockchain", "Blockchain"),
    sub("etl", "ETL"),
    sub("data warehousing", "Data Warehousing"),
];

const SOFT_SKILLS: &[VocabularyEntry] = &[
    sub("leadership", "Leadership"),
    sub("communication", "Communication"),
    sub("teamwork", "Teamwork"),
    sub("problem solving", "Problem Solving"),
    sub("analytical thinking", "Analytical Thinking"),
    sub("time management", "Time Management"),
    sub("project management", "Project Management"),
    sub("agile", "Agile"),
    sub("scrum", "Scrum"),
    sub("kanban", "Kanban"),
    sub("collaboration", "Collaboration"),
    sub("adaptability", "Adaptability"),
    sub("creativity", "Creativity"),
    sub("attention to detail", "Attention to Detail"),
    sub("critical thinking", "Critical Thinking"),
    sub("negotiation", "Negotiation"),
    sub("mentoring", "Mentoring"),
    sub("client management", "Client Management"),
    sub("stakeholder management", "Stakeholder Management"),
];

/// alias → canonical key. Aliases are matched as whole normalized tokens.
const ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("postgres", "postgresql"),
    ("ml", "machine learning"),
    ("ai", "artificial intelligence"),
    ("gcp", "google cloud"),
    ("spring", "spring boot"),
    ("node", "nodejs"),
    ("k8s", "kubernetes"),
    ("golang", "go"),
    ("sklearn", "scikit-learn"),
    ("express", "expressjs"),
];

// ────────────────────────────────────────────────────────────────────────────
// SkillVocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Frozen lookup tables used by the requirement extractor.
///
/// Cheap to clone; the built-in tables are `'static`.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    entries: Vec<VocabularyEntry>,
    aliases: Vec<(&'static str, &'static str)>,
}

impl SkillVocabulary {
    pub fn new(
        entries: Vec<VocabularyEntry>,
        aliases: Vec<(&'static str, &'static str)>,
    ) -> Self {
        Self { entries, aliases }
    }

    /// Technical skills followed by soft skills.
    pub fn builtin() -> Self {
        let entries = TECHNICAL_SKILLS
            .iter()
            .chain(SOFT_SKILLS.iter())
            .copied()
            .collect();
        Self::new(entries, ALIASES.to_vec())
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// Aliases that resolve to `key`, in table order.
    pub fn aliases_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.aliases
            .iter()
            .filter(move |(_, canonical)| *canonical == key)
            .map(|(alias, _)| *alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}
