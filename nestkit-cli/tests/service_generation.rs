//! Render and register a service against a scratch NestJS project

use nestkit::registrar::module_file::ModuleFile;
use nestkit::registrar::{self, patch, ModuleRegistration, RegistrationOutcome};
use nestkit::{Answers, Connection, DatabaseKind, ServiceGenerator, ServiceName};
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const APP_MODULE: &str = "import { Module } from '@nestjs/common';
import { AppController } from './app.controller';
import { AppService } from './app.service';

@Module({
  imports: [],
  controllers: [AppController],
  providers: [AppService],
})
export class AppModule {}
";

fn answers(name: &str, db: DatabaseKind, connection: Connection) -> Answers {
    let service = ServiceName::parse(name).unwrap();
    Answers {
        db_name: service.default_db_name(),
        service,
        db,
        connection,
    }
}

fn generate(src: &Path, answers: &Answers) -> RegistrationOutcome {
    let generator = ServiceGenerator::new(answers).unwrap();
    generator.write_all(src).unwrap();
    let registration = ModuleRegistration::from(generator.context());
    registrar::register(&src.join("app.module.ts"), &registration).unwrap()
}

#[test]
fn test_sqlite_service_end_to_end() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("app.module.ts"), APP_MODULE).unwrap();

    let outcome = generate(&src, &answers("widget", DatabaseKind::Sqlite, Connection::File));
    assert_eq!(outcome, RegistrationOutcome::Registered);

    let entity = fs::read_to_string(src.join("widget/entities/widget.entity.ts")).unwrap();
    assert!(entity.contains("export class Widget {"));
    let dto = fs::read_to_string(src.join("widget/dto/create-widget.dto.ts")).unwrap();
    assert!(dto.contains("export class CreateWidgetDto {"));
    let module = fs::read_to_string(src.join("widget/widget.module.ts")).unwrap();
    assert!(module.contains("database: 'widget_db.sqlite',"));

    let root = fs::read_to_string(src.join("app.module.ts")).unwrap();
    assert!(root.contains(
        "import { AppService } from './app.service';\nimport { WidgetModule } from './widget/widget.module';\n"
    ));
    assert_eq!(ModuleFile::parse(&root).import_entries(), ["WidgetModule"]);
}

#[test]
fn test_second_service_goes_first_in_imports() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("app.module.ts"), APP_MODULE).unwrap();

    generate(&src, &answers("widget", DatabaseKind::Sqlite, Connection::File));
    generate(
        &src,
        &answers(
            "orders",
            DatabaseKind::Mongodb,
            Connection::Document {
                uri: "mongodb://localhost:27017".to_string(),
            },
        ),
    );

    let root = fs::read_to_string(src.join("app.module.ts")).unwrap();
    let file = ModuleFile::parse(&root);
    assert_eq!(file.import_entries(), ["OrdersModule", "WidgetModule"]);

    let module = fs::read_to_string(src.join("orders/orders.module.ts")).unwrap();
    assert!(module.contains("MongooseModule.forRoot('mongodb://localhost:27017/orders_db')"));
    assert!(src.join("orders/entities/orders.schema.ts").is_file());
}

#[test]
fn test_rerun_leaves_root_module_byte_identical() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("app.module.ts"), APP_MODULE).unwrap();

    let answers = answers("widget", DatabaseKind::Sqlite, Connection::File);
    generate(&src, &answers);
    let first = fs::read(src.join("app.module.ts")).unwrap();

    assert_eq!(generate(&src, &answers), RegistrationOutcome::AlreadyRegistered);
    assert_eq!(fs::read(src.join("app.module.ts")).unwrap(), first);
}

#[test]
fn test_root_module_without_decorator_gets_import_only() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("app.module.ts"), "export class AppModule {}\n").unwrap();

    let outcome = generate(&src, &answers("widget", DatabaseKind::Sqlite, Connection::File));

    assert_eq!(outcome, RegistrationOutcome::ImportOnly);
    let root = fs::read_to_string(src.join("app.module.ts")).unwrap();
    assert_eq!(
        root,
        "import { WidgetModule } from './widget/widget.module';\nexport class AppModule {}\n"
    );
}

#[test]
fn test_root_module_already_patched_by_nest_generate() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    // What `nest generate module userprofile` leaves behind
    let nest_patched = "import { Module } from '@nestjs/common';
import { AppController } from './app.controller';
import { AppService } from './app.service';
import { UserprofileModule } from './userprofile/userprofile.module';

@Module({
  imports: [UserprofileModule],
  controllers: [AppController],
  providers: [AppService],
})
export class AppModule {}
";
    fs::write(src.join("app.module.ts"), nest_patched).unwrap();

    let outcome = generate(&src, &answers("userProfile", DatabaseKind::Sqlite, Connection::File));

    assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
    assert_eq!(fs::read_to_string(src.join("app.module.ts")).unwrap(), nest_patched);
    let module = fs::read_to_string(src.join("userprofile/userprofile.module.ts")).unwrap();
    assert!(module.contains("export class UserprofileModule {}"));
}

#[test]
fn test_semicolon_free_root_module_end_to_end() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("app.module.ts"),
        "import { Module } from '@nestjs/common'
import { ConfigModule } from '@nestjs/config'

@Module({
  imports: [
    ConfigModule.forRoot({ load: [() => { return { port: 3000 }; }] }),
  ],
})
export class AppModule {}
",
    )
    .unwrap();

    generate(&src, &answers("widget", DatabaseKind::Sqlite, Connection::File));

    let root = fs::read_to_string(src.join("app.module.ts")).unwrap();
    assert!(root.starts_with(
        "import { Module } from '@nestjs/common'
import { ConfigModule } from '@nestjs/config'
import { WidgetModule } from './widget/widget.module';

@Module({"
    ));
    assert_eq!(root.matches("import { WidgetModule }").count(), 1);
    let file = ModuleFile::parse(&root);
    assert_eq!(file.import_entries()[0], "WidgetModule");
    assert_eq!(file.import_entries().len(), 2);
}

proptest! {
    #[test]
    fn class_name_matches_nest_generate_for_lower_name(name in "[A-Za-z][A-Za-z0-9]{0,15}") {
        let service = ServiceName::parse(&name).unwrap();
        let lower = service.lower();
        let mut chars = lower.chars();
        let nest_class: String = chars
            .next()
            .map(|first| first.to_ascii_uppercase())
            .into_iter()
            .chain(chars)
            .collect();

        prop_assert_eq!(service.pascal(), nest_class);
    }

    #[test]
    fn registering_twice_keeps_one_import_and_one_entry(name in "[A-Za-z][A-Za-z0-9]{0,15}") {
        let service = ServiceName::parse(&name).unwrap();
        let registration = ModuleRegistration::new(service.pascal(), service.lower());
        let import_line = registration.import_line();
        let ident = registration.module_ident();

        let (once, _) = patch(APP_MODULE, &registration);
        let once = once.unwrap();
        let (twice, outcome) = patch(&once, &registration);

        prop_assert!(twice.is_none());
        prop_assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
        prop_assert_eq!(once.matches(&import_line).count(), 1);

        let file = ModuleFile::parse(&once);
        let entries = file.import_entries().iter().filter(|e| **e == ident).count();
        prop_assert_eq!(entries, 1);
    }

    #[test]
    fn registering_keeps_existing_entries(name in "[A-Za-z][A-Za-z0-9]{0,15}") {
        let existing = "import { Module } from '@nestjs/common';\n\n@Module({\n  imports: [\n    ConfigModule.forRoot(),\n    'x,y',\n  ],\n})\nexport class AppModule {}\n";
        let service = ServiceName::parse(&name).unwrap();
        let registration = ModuleRegistration::new(service.pascal(), service.lower());

        let (patched, _) = patch(existing, &registration);
        let patched = patched.unwrap();
        let file = ModuleFile::parse(&patched);
        let entries = file.import_entries();

        prop_assert_eq!(entries.len(), 3);
        prop_assert_eq!(&entries[0], &registration.module_ident());
        prop_assert_eq!(&entries[1], "ConfigModule.forRoot()");
        prop_assert_eq!(&entries[2], "'x,y'");
    }
}
