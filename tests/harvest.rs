mod common;

use adfharvest::Harvester;
use common::{descriptor_xml, install_fixture};

const VERSION: &str = "11.1.1.5.0";

#[test]
fn test_full_harvest_produces_documents_and_units() {
    let fx = install_fixture();
    fx.plain_jar(&fx.root_path("lib/adfshare.jar"));
    fx.descriptor_jar(
        "jdev/extensions/oracle.adf.share.jar",
        &descriptor_xml(
            "oracle.adf.share",
            "11.1.1.5.37",
            "ADF Share",
            &["../../lib/adfshare.jar"],
        ),
    );

    let outcome = Harvester::new(fx.config(VERSION)).run().unwrap();

    assert_eq!(outcome.summary.archives_scanned, 2);
    assert_eq!(outcome.summary.descriptors_found, 1);
    assert_eq!(outcome.summary.libraries, 1);
    assert_eq!(outcome.summary.entries, 1);
    assert!(outcome.summary.failed_documents.is_empty());
    // library pom + aggregate + jar pom + publish plan
    assert_eq!(outcome.summary.documents_written, 4);

    let pom = std::fs::read_to_string(fx.work_dir.join("poms/ADF_Share.pom")).unwrap();
    assert!(pom.starts_with("<project>\n  <modelVersion>4.0.0</modelVersion>"));
    assert!(pom.contains("<groupId>com.oracle.jdeveloper.library</groupId>"));
    assert!(pom.contains("<artifactId>ADF_Share</artifactId>"));
    assert!(pom.contains("<!-- JDeveloper library name: 'ADF Share' -->"));
    assert!(pom.contains("<!-- Extension ID: 'oracle.adf.share' -->"));
    assert!(pom.contains("<!-- Extension Version: '11.1.1.5.37' -->"));
    assert!(pom.contains(
        "generated from ${JDEVHOME}/jdev/extensions/oracle.adf.share.jar!META-INF/extension.xml"
    ));
    assert!(pom.contains("<name>ADF Share</name>"));

    assert!(fx.work_dir.join("dependencyManagement.xml").is_file());
    assert!(fx.work_dir.join("publish-plan.json").is_file());

    assert_eq!(outcome.units.len(), 3);
    assert_eq!(outcome.units[0].artifact_id, "ADF_Share");
    assert_eq!(outcome.units[0].packaging, "pom");
    assert_eq!(outcome.units[1].packaging, "pom");
    assert_eq!(outcome.units[2].packaging, "jar");
    assert!(outcome.units[2].file.ends_with("lib/adfshare.jar"));
}

#[test]
fn test_jar_under_middleware_home_gets_structural_coordinates() {
    let fx = install_fixture();
    fx.plain_jar(&fx.middleware_path("BC4J/lib/adfshare.jar"));
    fx.descriptor_jar(
        "jdev/extensions/oracle.bc4j.jar",
        &descriptor_xml(
            "oracle.bc4j",
            "11.1.1.5.0",
            "BC4J Runtime",
            &["../../../BC4J/lib/adfshare.jar"],
        ),
    );

    let outcome = Harvester::new(fx.config(VERSION)).run().unwrap();

    let aggregate = std::fs::read_to_string(fx.work_dir.join("dependencyManagement.xml")).unwrap();
    assert!(aggregate.contains("<groupId>com.oracle.jdeveloper.jars.BC4J.lib</groupId>"));
    assert!(aggregate.contains("<artifactId>adfshare</artifactId>"));
    assert!(aggregate.contains("<scope>provided</scope>"));

    let jar_unit = outcome
        .units
        .iter()
        .find(|u| u.packaging == "jar")
        .unwrap();
    assert_eq!(jar_unit.group_id, "com.oracle.jdeveloper.jars.BC4J.lib");
    assert_eq!(jar_unit.artifact_id, "adfshare");
    assert!(jar_unit.file.ends_with("BC4J/lib/adfshare.jar"));
    assert!(
        fx.work_dir
            .join("poms/jars/com.oracle.jdeveloper.jars.BC4J.lib.adfshare.pom")
            .is_file()
    );
}

#[test]
fn test_manifest_classpath_chased_one_generation() {
    let fx = install_fixture();
    fx.manifest_jar(
        &fx.root_path("lib/trigger.jar"),
        "Manifest-Version: 1.0\nClass-Path: a.jar b.jar\n",
    );
    // a.jar has its own classpath that must stay unchased
    fx.manifest_jar(
        &fx.root_path("lib/a.jar"),
        "Manifest-Version: 1.0\nClass-Path: c.jar\n",
    );
    fx.plain_jar(&fx.root_path("lib/b.jar"));
    fx.plain_jar(&fx.root_path("lib/c.jar"));
    fx.descriptor_jar(
        "jdev/extensions/chain.jar",
        &descriptor_xml("chain.ext", "1.0", "Chained", &["../../lib/trigger.jar"]),
    );

    let outcome = Harvester::new(fx.config(VERSION)).run().unwrap();
    assert_eq!(outcome.summary.entries, 3);

    let pom = std::fs::read_to_string(fx.work_dir.join("poms/Chained.pom")).unwrap();
    assert!(pom.contains("<!-- This dependency is from a MANIFEST classpath reference -->"));
    assert!(pom.contains("<!-- Manifest Info: -->"));
    assert!(pom.contains("<!--   Class-Path=a.jar b.jar -->"));
    assert!(pom.contains("<artifactId>a</artifactId>"));
    assert!(pom.contains("<artifactId>b</artifactId>"));
    assert!(!pom.contains("<artifactId>c</artifactId>"));

    // library unit plus three jars, a coordinate pom and the jar each
    assert_eq!(outcome.units.len(), 7);
    assert!(!outcome.units.iter().any(|u| u.artifact_id == "c"));
}

#[test]
fn test_unresolved_entry_recorded_as_comment() {
    let fx = install_fixture();
    fx.descriptor_jar(
        "jdev/extensions/partial.jar",
        &descriptor_xml(
            "partial.ext",
            "1.0",
            "Partial",
            &["../../lib/devious-missing.jar"],
        ),
    );

    let outcome = Harvester::new(fx.config(VERSION)).run().unwrap();

    let pom = std::fs::read_to_string(fx.work_dir.join("poms/Partial.pom")).unwrap();
    assert!(
        pom.contains("<!-- No jar file found, but dependency was found for devious-missing -->")
    );
    assert!(pom.contains("    <!--\n    <dependency>\n"));

    // the aggregate records the dependency even without a file behind it
    let aggregate = std::fs::read_to_string(fx.work_dir.join("dependencyManagement.xml")).unwrap();
    assert!(aggregate.contains("<artifactId>devious-missing</artifactId>"));

    // the plan only covers real files
    assert_eq!(outcome.units.len(), 1);
    assert_eq!(outcome.units[0].artifact_id, "Partial");
}

#[test]
fn test_descriptorless_tree_yields_empty_documents() {
    let fx = install_fixture();
    fx.plain_jar(&fx.root_path("jdev/lib/one.jar"));
    fx.plain_jar(&fx.root_path("jdev/lib/two.jar"));

    let outcome = Harvester::new(fx.config(VERSION)).run().unwrap();

    assert_eq!(outcome.summary.archives_scanned, 2);
    assert_eq!(outcome.summary.descriptors_found, 0);
    assert_eq!(outcome.summary.libraries, 0);
    // aggregate + publish plan
    assert_eq!(outcome.summary.documents_written, 2);
    assert!(outcome.units.is_empty());

    let aggregate = std::fs::read_to_string(fx.work_dir.join("dependencyManagement.xml")).unwrap();
    let expected = "  <dependencyManagement>
    <dependencies>
      <!-- JDev libraries -->
      <!-- JDev library jars -->
    </dependencies>
  </dependencyManagement>
";
    assert_eq!(aggregate, expected);

    let plan = std::fs::read_to_string(fx.work_dir.join("publish-plan.json")).unwrap();
    assert_eq!(plan, "[]");
}

#[test]
fn test_repeated_harvest_is_byte_identical() {
    let fx = install_fixture();
    fx.plain_jar(&fx.root_path("lib/real.jar"));
    fx.manifest_jar(
        &fx.root_path("lib/chain.jar"),
        "Manifest-Version: 1.0\nClass-Path: real.jar\n",
    );
    fx.descriptor_jar(
        "jdev/extensions/stable.jar",
        &descriptor_xml(
            "stable.ext",
            "2.1",
            "Stable Lib",
            &["../../lib/chain.jar", "../../lib/gone.jar"],
        ),
    );

    let harvester = Harvester::new(fx.config(VERSION));
    harvester.run().unwrap();

    let read_all = |fx: &common::InstallFixture| {
        (
            std::fs::read(fx.work_dir.join("poms/Stable_Lib.pom")).unwrap(),
            std::fs::read(fx.work_dir.join("dependencyManagement.xml")).unwrap(),
            std::fs::read(fx.work_dir.join("publish-plan.json")).unwrap(),
        )
    };
    let first = read_all(&fx);
    harvester.run().unwrap();
    assert_eq!(first, read_all(&fx));
}

#[test]
fn test_snapshot_jars_stay_out_of_publish_plan() {
    let fx = install_fixture();
    fx.plain_jar(&fx.root_path("lib/tool-1.0-SNAPSHOT.jar"));
    fx.descriptor_jar(
        "jdev/extensions/snap.jar",
        &descriptor_xml(
            "snap.ext",
            "1.0",
            "Snapshot Lib",
            &["../../lib/tool-1.0-SNAPSHOT.jar"],
        ),
    );

    let outcome = Harvester::new(fx.config(VERSION)).run().unwrap();

    // present in the documents
    let pom = std::fs::read_to_string(fx.work_dir.join("poms/Snapshot_Lib.pom")).unwrap();
    assert!(pom.contains("<artifactId>tool-1.0-SNAPSHOT</artifactId>"));
    let aggregate = std::fs::read_to_string(fx.work_dir.join("dependencyManagement.xml")).unwrap();
    assert!(aggregate.contains("<artifactId>tool-1.0-SNAPSHOT</artifactId>"));

    // absent from the plan
    assert_eq!(outcome.units.len(), 1);
    assert_eq!(outcome.units[0].artifact_id, "Snapshot_Lib");
}

#[test]
fn test_shared_jar_listed_once_across_libraries() {
    let fx = install_fixture();
    fx.plain_jar(&fx.root_path("lib/shared.jar"));
    fx.plain_jar(&fx.root_path("lib/alpha-only.jar"));
    fx.plain_jar(&fx.root_path("lib/beta-only.jar"));
    fx.descriptor_jar(
        "jdev/extensions/alpha_ext.jar",
        &descriptor_xml(
            "alpha.ext",
            "1.0",
            "Alpha Lib",
            &["../../lib/shared.jar", "../../lib/alpha-only.jar"],
        ),
    );
    fx.descriptor_jar(
        "jdev/extensions/beta_ext.jar",
        &descriptor_xml(
            "beta.ext",
            "1.0",
            "Beta Lib",
            &["../../lib/shared.jar", "../../lib/beta-only.jar"],
        ),
    );

    let outcome = Harvester::new(fx.config(VERSION)).run().unwrap();
    assert_eq!(outcome.summary.libraries, 2);

    let aggregate = std::fs::read_to_string(fx.work_dir.join("dependencyManagement.xml")).unwrap();
    assert_eq!(
        aggregate
            .matches("<artifactId>shared</artifactId>")
            .count(),
        1
    );

    let shared_units: Vec<_> = outcome
        .units
        .iter()
        .filter(|u| u.artifact_id == "shared")
        .collect();
    assert_eq!(shared_units.len(), 2);
    assert_eq!(shared_units[0].packaging, "pom");
    assert_eq!(shared_units[1].packaging, "jar");
}

#[test]
fn test_coherence_placeholder_rename() {
    let fx = install_fixture();
    fx.descriptor_jar(
        "jdev/extensions/coherence.jar",
        &descriptor_xml(
            "oracle.coherence",
            "3.6",
            "${COHERENCE_RUNTIME_LIB_NAME}",
            &[],
        ),
    );

    let outcome = Harvester::new(fx.config(VERSION)).run().unwrap();
    assert_eq!(outcome.catalog.libraries[0].name, "Coherence Runtime");

    let pom = std::fs::read_to_string(fx.work_dir.join("poms/Coherence_Runtime.pom")).unwrap();
    assert!(pom.contains("<name>Coherence Runtime</name>"));
    assert_eq!(outcome.units[0].artifact_id, "Coherence_Runtime");
}
