#[cfg(test)]
mod tests {
    use crate::builders::analyzer::ConflictType;
    use crate::builders::fixer::FixStatus;
    use crate::builders::rules::{Action, DirectoryMode, MoveDirection, Rule};
    use crate::builders::storage::{MemoryRepository, ParsePolicy, RenderOptions, DEFAULT_HEADER};
    use crate::core::engine::IgnoreService;
    use crate::core::error::RuleError;
    use std::path::Path;

    const IGNORE_FILE: &str = ".gitignore";

    fn setup_service() -> IgnoreService<MemoryRepository> {
        IgnoreService::new(MemoryRepository::default())
    }

    fn seeded_service(content: &str) -> IgnoreService<MemoryRepository> {
        let mut repo = MemoryRepository::default();
        repo.insert(IGNORE_FILE, content).unwrap();
        IgnoreService::new(repo)
    }

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn lines(service: &IgnoreService<MemoryRepository>) -> Vec<String> {
        service
            .list_rules(Path::new(IGNORE_FILE))
            .unwrap()
            .iter()
            .map(Rule::render)
            .collect()
    }

    #[test]
    fn test_init_creates_file_once() {
        let mut service = setup_service();
        let path = Path::new(IGNORE_FILE);

        service.init(path).unwrap();
        assert_eq!(
            service.repository().content(path),
            Some(format!("# {DEFAULT_HEADER}\n"))
        );
        assert!(matches!(service.init(path), Err(RuleError::AlreadyExists { .. })));
    }

    #[test]
    fn test_add_each_kind() {
        let mut service = setup_service();
        let path = Path::new(IGNORE_FILE);

        service.add_file_rule(path, &values(&["secrets.env"]), Action::Include).unwrap();
        service
            .add_directory_rule(path, &values(&["target"]), DirectoryMode::Root, Action::Include)
            .unwrap();
        service.add_extension_rule(path, &values(&["log"]), Action::Include).unwrap();
        service.add_glob_rule(path, &values(&[".coverage.*"]), Action::Include).unwrap();
        service.add_file_rule(path, &values(&["important.log"]), Action::Exclude).unwrap();

        assert_eq!(
            lines(&service),
            vec!["secrets.env", "/target/", "*.log", ".coverage.*", "!important.log"]
        );
    }

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let mut service = setup_service();
        let path = Path::new(IGNORE_FILE);

        let first = service.add_file_rule(path, &values(&["a.txt"]), Action::Include).unwrap();
        let second = service.add_file_rule(path, &values(&["a.txt"]), Action::Include).unwrap();

        assert!(first[0].success);
        assert!(!second[0].success);
        assert!(second[0].log().contains("already exists"));
        assert_eq!(lines(&service), vec!["a.txt"]);
    }

    #[test]
    fn test_add_several_values_reports_each() {
        let mut service = setup_service();
        let path = Path::new(IGNORE_FILE);

        let results = service
            .add_extension_rule(path, &values(&["log", "tmp", ".log"]), Action::Include)
            .unwrap();

        let successes: Vec<bool> = results.iter().map(|r| r.success).collect();
        assert_eq!(successes, vec![true, true, false]);
        assert_eq!(lines(&service), vec!["*.log", "*.tmp"]);
    }

    #[test]
    fn test_add_invalid_value_is_rejected() {
        let mut service = seeded_service("*.log\n");
        let err = service
            .add_file_rule(Path::new(IGNORE_FILE), &values(&["  "]), Action::Include)
            .unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
        assert_eq!(lines(&service), vec!["*.log"]);
    }

    #[test]
    fn test_malformed_file_skipped_when_lenient() {
        let mut repo = MemoryRepository::new(RenderOptions::default(), ParsePolicy::Skip);
        repo.insert(IGNORE_FILE, "*.log\n!\n").unwrap();
        let service = IgnoreService::new(repo);
        assert_eq!(lines(&service), vec!["*.log"]);
    }

    #[test]
    fn test_delete_each_kind() {
        let mut service = seeded_service("a.txt\nbuild/**\n*.log\n!keep-*\n");
        let path = Path::new(IGNORE_FILE);

        service.delete_file_rule(path, "a.txt", Action::Include).unwrap();
        service
            .delete_directory_rule(path, "build", DirectoryMode::Recursive, Action::Include)
            .unwrap();
        service.delete_extension_rule(path, "log", Action::Include).unwrap();
        service.delete_glob_rule(path, "keep-*", Action::Exclude).unwrap();

        assert!(lines(&service).is_empty());
    }

    #[test]
    fn test_delete_requires_matching_action() {
        let mut service = seeded_service("a.txt\n");
        let err = service
            .delete_file_rule(Path::new(IGNORE_FILE), "a.txt", Action::Exclude)
            .unwrap_err();
        assert!(matches!(err, RuleError::NotFound { .. }));
        assert_eq!(lines(&service), vec!["a.txt"]);
    }

    #[test]
    fn test_move_rule_persists_new_order() {
        let mut service = seeded_service("*.log\n!keep.log\nkeep.log\n");
        let path = Path::new(IGNORE_FILE);

        let result = service
            .move_rule(path, "!keep.log", "keep.log", MoveDirection::After)
            .unwrap();
        assert!(result.success);
        assert_eq!(lines(&service), vec!["*.log", "keep.log", "!keep.log"]);
    }

    #[test]
    fn test_move_rule_errors_leave_file_untouched() {
        let mut service = seeded_service("a\nb\n");
        let path = Path::new(IGNORE_FILE);

        assert!(matches!(
            service.move_rule(path, "c", "a", MoveDirection::Before),
            Err(RuleError::NotFound { .. })
        ));
        assert!(matches!(
            service.move_rule(path, "a", "a", MoveDirection::Before),
            Err(RuleError::SameRule { .. })
        ));
        assert_eq!(lines(&service), vec!["a", "b"]);
    }

    #[test]
    fn test_contradiction_scenario_keeps_insertion_order() {
        let mut service = setup_service();
        let path = Path::new(IGNORE_FILE);

        service.add_file_rule(path, &values(&["build/out"]), Action::Include).unwrap();
        service.add_file_rule(path, &values(&["build/out"]), Action::Exclude).unwrap();

        let conflicts = service.analyze_conflicts(path).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Contradiction);
        assert_eq!(lines(&service), vec!["build/out", "!build/out"]);
    }

    #[test]
    fn test_glob_then_extension_is_redundant_and_fixed() {
        let mut service = setup_service();
        let path = Path::new(IGNORE_FILE);

        service.add_glob_rule(path, &values(&["logs/*.log"]), Action::Include).unwrap();
        service.add_extension_rule(path, &values(&["log"]), Action::Include).unwrap();

        let conflicts = service.analyze_conflicts(path).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Redundant);

        let report = service.auto_fix(path, 1).unwrap();
        assert_eq!(report.status, FixStatus::Resolved);
        assert_eq!(report.edits.len(), 1);
        assert_eq!(lines(&service), vec!["*.log"]);
    }

    #[test]
    fn test_glob_then_same_extension_keeps_the_glob() {
        let mut service = setup_service();
        let path = Path::new(IGNORE_FILE);

        service.add_glob_rule(path, &values(&["*.log"]), Action::Include).unwrap();
        let added = service.add_extension_rule(path, &values(&["log"]), Action::Include).unwrap();
        assert!(added[0].success);

        let conflicts = service.analyze_conflicts(path).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Redundant);

        let report = service.auto_fix(path, 1).unwrap();
        assert!(report.is_resolved());
        let rules = service.list_rules(path).unwrap();
        assert_eq!(rules, vec![Rule::glob("*.log", Action::Include).unwrap()]);
    }

    #[test]
    fn test_auto_fix_on_clean_file_changes_nothing() {
        let mut service = seeded_service("*.log\n!keep.log\n");
        let path = Path::new(IGNORE_FILE);

        let report = service.auto_fix(path, 20).unwrap();
        assert!(report.is_resolved());
        assert!(report.edits.is_empty());
        assert_eq!(lines(&service), vec!["*.log", "!keep.log"]);
    }

    #[test]
    fn test_auto_fix_partial_reports_remaining() {
        let mut service = seeded_service("a\na\nb\nb\n");
        let path = Path::new(IGNORE_FILE);

        let report = service.auto_fix(path, 1).unwrap();
        assert_eq!(report.status, FixStatus::PartialFix);
        assert_eq!(report.edits.len(), 1);
        assert_eq!(report.remaining.len(), 1);
        assert_eq!(lines(&service), vec!["a", "b", "b"]);
    }
}
