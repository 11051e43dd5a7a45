// src/common/i18n.rs

use std::collections::HashMap;

use crate::middleware::i18n::DEFAULT_LANG;

/// Catálogo dos títulos de erro por idioma, indexado pelo código do erro.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        let en = HashMap::from([
            ("UNAUTHENTICATED", "Authentication required"),
            ("UNAUTHORIZED", "Access denied"),
            ("INVALID_SEQUENCE", "Invalid punch sequence"),
            ("INVALID_INPUT", "Invalid input"),
            ("NOT_FOUND", "Not found"),
            ("INTERNAL", "Internal server error"),
        ]);
        let pt = HashMap::from([
            ("UNAUTHENTICATED", "Autenticação necessária"),
            ("UNAUTHORIZED", "Acesso negado"),
            ("INVALID_SEQUENCE", "Sequência de ponto inválida"),
            ("INVALID_INPUT", "Dados inválidos"),
            ("NOT_FOUND", "Não encontrado"),
            ("INTERNAL", "Erro interno do servidor"),
        ]);

        Self {
            catalogs: HashMap::from([("en", en), ("pt", pt)]),
        }
    }
}

impl I18nStore {
    /// Traduz `key` para `lang`, caindo para inglês e depois para a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
