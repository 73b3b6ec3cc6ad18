/// Counters collected during a wrangling run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WrangleStats {
    pub doc_rows: u64,
    pub category_rows: u64,
    pub articles_inserted: u64,
    pub author_links: u64,
    pub affiliation_links: u64,
    pub keyword_links: u64,
    pub label_links: u64,
}

impl WrangleStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_doc_rows(&mut self) {
        self.doc_rows += 1;
    }

    pub fn inc_category_rows(&mut self) {
        self.category_rows += 1;
    }

    pub fn inc_articles(&mut self) {
        self.articles_inserted += 1;
    }

    pub fn inc_author_links(&mut self) {
        self.author_links += 1;
    }

    pub fn inc_affiliation_links(&mut self) {
        self.affiliation_links += 1;
    }

    pub fn inc_keyword_links(&mut self) {
        self.keyword_links += 1;
    }

    pub fn inc_label_links(&mut self) {
        self.label_links += 1;
    }

    pub fn rows(&self) -> u64 {
        self.doc_rows + self.category_rows
    }

    pub fn links(&self) -> u64 {
        self.author_links + self.affiliation_links + self.keyword_links + self.label_links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_zero() {
        let stats = WrangleStats::new();
        assert_eq!(stats.rows(), 0);
        assert_eq!(stats.links(), 0);
        assert_eq!(stats.articles_inserted, 0);
    }

    #[test]
    fn mixed_operations() {
        let mut stats = WrangleStats::new();
        stats.inc_doc_rows();
        stats.inc_doc_rows();
        stats.inc_category_rows();
        stats.inc_articles();
        stats.inc_author_links();
        stats.inc_affiliation_links();
        stats.inc_keyword_links();
        stats.inc_keyword_links();
        stats.inc_label_links();

        assert_eq!(stats.rows(), 3);
        assert_eq!(stats.articles_inserted, 1);
        assert_eq!(stats.links(), 5);
        assert_eq!(stats.keyword_links, 2);
    }
}
