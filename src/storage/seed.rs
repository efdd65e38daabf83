//! Sample articles inserted on first start.
//!
//! Ids are fixed so the insert can be keyed on them and re-running the seed
//! against a populated table changes nothing.

use super::types::NewArticle;

#[allow(clippy::too_many_arguments)]
fn article(
    id: i64,
    title: &str,
    content: &str,
    author: &str,
    category: &str,
    read_time: i64,
    likes: i64,
    tags: &[&str],
) -> NewArticle {
    NewArticle {
        id,
        title: title.to_string(),
        content: content.to_string(),
        author: author.to_string(),
        category: category.to_string(),
        read_time,
        likes,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// The fixed sample set: four articles, 85 likes in total
pub fn seed_articles() -> Vec<NewArticle> {
    vec![
        article(
            1,
            "Sécuriser vos images Docker",
            "Les images de conteneurs embarquent souvent des dépendances vulnérables. \
             Utilisez des images de base minimales, scannez chaque build et signez vos artefacts.",
            "Marie Dupont",
            "Conteneurs",
            6,
            12,
            &["docker", "sécurité", "supply-chain"],
        ),
        article(
            2,
            "Gestion des secrets dans un pipeline CI/CD",
            "Ne stockez jamais de secrets dans le dépôt. Injectez-les au moment de l'exécution \
             depuis un coffre-fort et limitez leur portée à chaque job.",
            "Thomas Martin",
            "CI/CD",
            8,
            24,
            &["secrets", "pipeline", "vault"],
        ),
        article(
            3,
            "Analyse statique du code avec SAST",
            "Intégrer un outil SAST dès les premières étapes du pipeline permet de détecter \
             les injections et les mauvaises configurations avant la mise en production.",
            "Sophie Bernard",
            "Sécurité",
            5,
            18,
            &["sast", "qualité", "shift-left"],
        ),
        article(
            4,
            "Durcir un cluster Kubernetes",
            "Activez les politiques réseau, restreignez les privilèges des pods et isolez \
             les charges de travail. Les conteneurs construits avec Docker doivent tourner sans root.",
            "Lucas Petit",
            "Conteneurs",
            10,
            31,
            &["Kubernetes", "RBAC", "hardening"],
        ),
    ]
}
