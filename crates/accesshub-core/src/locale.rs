// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// UI string tables and language resolution.
//
// English is the single required base. Every other table may be sparse;
// resolution overlays it on English key by key so the result is always
// complete.

use std::collections::{BTreeMap, HashMap};

/// Fallback language. Its table defines the full key set.
pub const BASE_LANGUAGE: &str = "en";

/// Languages offered in the language picker, with their native names.
///
/// The conversion service accepts all of these; not all of them have UI
/// tables yet and those degrade to English.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("hi", "हिन्दी"),
    ("pt", "Português"),
    ("zh", "中文"),
    ("ar", "العربية"),
];

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

const EN: &[(&str, &str)] = &[
    ("app.title", "Accessibility Learning Hub"),
    ("upload.prompt", "Drag & Drop your PDF/DOCX here, or click to browse"),
    ("upload.url_hint", "...or paste a YouTube link"),
    ("upload.max_size", "Max size 50MB"),
    ("action.generate", "Generate Accessible Version"),
    ("action.processing", "Processing..."),
    ("action.start_new", "Start New Conversion"),
    ("settings.title", "Accessibility Settings"),
    ("settings.dyslexic_font", "Dyslexia Friendly Font"),
    ("settings.high_contrast", "High Contrast Theme"),
    ("settings.invert_colors", "Invert Colors"),
    ("result.complete", "Conversion Complete!"),
    ("result.report_title", "Accessibility Report"),
    ("result.overall_score", "Overall Score"),
    ("result.readability", "Readability Metrics"),
    ("result.structure", "Structure Analysis"),
    ("result.audio_title", "TTS Audio Playback"),
    ("result.audio_missing", "Audio file path missing or failed generation."),
    ("result.download_audio", "Download MP3"),
    ("result.download_epub", "Download EPUB"),
    ("result.download_pdf", "Download PDF"),
    ("result.content_title", "Simplified Content"),
    ("result.content_unavailable", "Could not load simplified content."),
    ("status.file_selected", "File selected: {name}"),
    ("status.url_selected", "Video link ready: {url}"),
    ("status.uploading", "Uploading and processing..."),
    ("status.success", "Success! Task ID: {task_id}. Results are ready."),
    ("status.report_corrupt", "(Report data is corrupt.)"),
    ("status.report_missing", "(Report generation failed.)"),
    ("status.content_failed", "Error fetching content: {detail}"),
    ("error.no_source", "Please select a file or paste a YouTube URL first."),
    ("error.unsupported_file", "Please select a PDF or DOCX file."),
    ("error.file_too_large", "That file is too large. The limit is {limit}."),
    ("error.invalid_url", "That doesn't look like a YouTube link. Check it and try again."),
    ("error.unrecognized_drop", "Drop a PDF or DOCX file, or a YouTube link."),
    ("error.busy", "A conversion is already in progress."),
    ("error.network", "Network or connection error. Is the conversion service running?"),
    ("error.conversion_failed", "Conversion Failed: {message}"),
    ("error.server_generic", "Server returned an error."),
    ("error.internal_generic", "Internal logic error."),
    ("error.config", "The settings have a problem: {detail}"),
    ("error.storage", "Could not read or write a local file."),
];

const ES: &[(&str, &str)] = &[
    ("app.title", "Centro de Aprendizaje Accesible"),
    ("upload.prompt", "Arrastra aquí tu PDF/DOCX o haz clic para buscar"),
    ("upload.url_hint", "...o pega un enlace de YouTube"),
    ("upload.max_size", "Tamaño máximo 50MB"),
    ("action.generate", "Generar versión accesible"),
    ("action.processing", "Procesando..."),
    ("action.start_new", "Nueva conversión"),
    ("settings.title", "Ajustes de accesibilidad"),
    ("settings.dyslexic_font", "Fuente para dislexia"),
    ("settings.high_contrast", "Tema de alto contraste"),
    ("settings.invert_colors", "Invertir colores"),
    ("result.complete", "¡Conversión completa!"),
    ("result.report_title", "Informe de accesibilidad"),
    ("result.overall_score", "Puntuación general"),
    ("result.readability", "Métricas de legibilidad"),
    ("result.structure", "Análisis de estructura"),
    ("result.audio_title", "Reproducción de audio"),
    ("result.audio_missing", "Falta el audio o no se pudo generar."),
    ("result.download_audio", "Descargar MP3"),
    ("result.download_epub", "Descargar EPUB"),
    ("result.download_pdf", "Descargar PDF"),
    ("result.content_title", "Contenido simplificado"),
    ("result.content_unavailable", "No se pudo cargar el contenido simplificado."),
    ("status.file_selected", "Archivo seleccionado: {name}"),
    ("status.url_selected", "Enlace de vídeo listo: {url}"),
    ("status.uploading", "Subiendo y procesando..."),
    ("status.success", "¡Listo! Tarea: {task_id}. Los resultados están disponibles."),
    ("status.report_corrupt", "(Los datos del informe están dañados.)"),
    ("status.report_missing", "(No se pudo generar el informe.)"),
    ("status.content_failed", "Error al obtener el contenido: {detail}"),
    ("error.no_source", "Selecciona primero un archivo o pega un enlace de YouTube."),
    ("error.unsupported_file", "Selecciona un archivo PDF o DOCX."),
    ("error.file_too_large", "El archivo es demasiado grande. El límite es {limit}."),
    ("error.invalid_url", "Eso no parece un enlace de YouTube. Revísalo e inténtalo de nuevo."),
    ("error.unrecognized_drop", "Suelta un archivo PDF o DOCX, o un enlace de YouTube."),
    ("error.busy", "Ya hay una conversión en curso."),
    ("error.network", "Error de red o de conexión. ¿Está funcionando el servicio de conversión?"),
    ("error.conversion_failed", "La conversión falló: {message}"),
    ("error.server_generic", "El servidor devolvió un error."),
    ("error.internal_generic", "Error interno."),
    ("error.config", "La configuración tiene un problema: {detail}"),
    ("error.storage", "No se pudo leer o escribir un archivo local."),
];

const FR: &[(&str, &str)] = &[
    ("app.title", "Centre d'apprentissage accessible"),
    ("action.generate", "Générer la version accessible"),
    ("action.processing", "Traitement..."),
    ("action.start_new", "Nouvelle conversion"),
    ("settings.title", "Paramètres d'accessibilité"),
    ("settings.dyslexic_font", "Police adaptée à la dyslexie"),
    ("settings.high_contrast", "Thème à contraste élevé"),
    ("result.complete", "Conversion terminée !"),
    ("result.report_title", "Rapport d'accessibilité"),
    ("status.uploading", "Envoi et traitement..."),
    ("error.no_source", "Veuillez d'abord choisir un fichier ou coller un lien YouTube."),
    ("error.unsupported_file", "Veuillez choisir un fichier PDF ou DOCX."),
];

const HI: &[(&str, &str)] = &[
    ("app.title", "सुलभ शिक्षण केंद्र"),
    ("action.generate", "सुलभ संस्करण बनाएं"),
    ("action.start_new", "नया रूपांतरण"),
    ("settings.dyslexic_font", "डिस्लेक्सिया अनुकूल फ़ॉन्ट"),
];

/// Complete or sparse mapping of string key to localized text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleTable {
    entries: BTreeMap<String, String>,
}

impl LocaleTable {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    /// Text for `key`. An unknown key yields the key itself so a missing
    /// string is visible rather than blank.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Text for `key` with `{name}` placeholders substituted.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.get(key).to_owned();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A new table with every key of `self`, preferring `overlay`'s text.
    fn overlaid_with(&self, overlay: &LocaleTable) -> LocaleTable {
        let entries = self
            .entries
            .iter()
            .map(|(key, base)| {
                let text = overlay.entries.get(key).unwrap_or(base);
                (key.clone(), text.clone())
            })
            .collect();
        LocaleTable { entries }
    }
}

/// Language code → table, with a mandatory English base.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    base: LocaleTable,
    tables: HashMap<String, LocaleTable>,
}

impl LocaleRegistry {
    /// A registry with only the base table.
    pub fn new(base: LocaleTable) -> Self {
        Self {
            base,
            tables: HashMap::new(),
        }
    }

    /// The tables shipped with the app.
    pub fn builtin() -> Self {
        let mut registry = Self::new(LocaleTable::from_pairs(EN));
        registry.insert("es", LocaleTable::from_pairs(ES));
        registry.insert("fr", LocaleTable::from_pairs(FR));
        registry.insert("hi", LocaleTable::from_pairs(HI));
        registry
    }

    /// Register a table. Registering the base code replaces the base.
    pub fn insert(&mut self, code: &str, table: LocaleTable) {
        if code == BASE_LANGUAGE {
            self.base = table;
        } else {
            self.tables.insert(code.to_owned(), table);
        }
    }

    pub fn base(&self) -> &LocaleTable {
        &self.base
    }

    pub fn has_table(&self, code: &str) -> bool {
        code == BASE_LANGUAGE || self.tables.contains_key(code)
    }

    /// Complete table for `code`. Unknown codes get English; known codes
    /// get English overlaid with whatever keys they define. Never fails.
    pub fn resolve(&self, code: &str) -> LocaleTable {
        match self.tables.get(code) {
            Some(table) => self.base.overlaid_with(table),
            None => self.base.clone(),
        }
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
