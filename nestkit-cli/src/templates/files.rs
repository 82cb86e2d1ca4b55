//! Template file contents
//!
//! Rendered with `trim_blocks` and `lstrip_blocks`, so block tags sit on their
//! own lines without leaving blank lines behind.

/// Mongoose schema for document databases
pub const SCHEMA_TS: &str = r"import { Schema, Document, model } from 'mongoose';

export const {{ ServiceName }}Schema = new Schema({
  created: { type: Date, default: Date.now },
  updated: { type: Date, default: Date.now },
  {{ serviceName }}_example: { type: String, required: true },
});

export interface {{ ServiceName }} extends Document {
  created: Date;
  updated: Date;
  {{ serviceName }}_example: string;
}

export const {{ ServiceName }}Model = model<{{ ServiceName }}>('{{ ServiceName }}', {{ ServiceName }}Schema);
";

/// `TypeORM` entity for relational and embedded databases
pub const ENTITY_TS: &str = r"import { Entity, Column, PrimaryGeneratedColumn, CreateDateColumn, UpdateDateColumn } from 'typeorm';

@Entity()
export class {{ ServiceName }} {
  @PrimaryGeneratedColumn('uuid')
  id: string;

  @CreateDateColumn()
  created: Date;

  @UpdateDateColumn()
  updated: Date;

  @Column()
  {{ serviceName }}_example: string;
}
";

/// Create DTO
pub const DTO_TS: &str = r"export class Create{{ ServiceName }}Dto {
  {{ serviceName }}_example: string;
}
";

/// Injectable service with create/find/remove
pub const SERVICE_TS: &str = r#"import { Injectable } from '@nestjs/common';
{% if db == "mongodb" %}
import { InjectModel } from '@nestjs/mongoose';
import { Model } from 'mongoose';
import { Create{{ ServiceName }}Dto } from './dto/create-{{ serviceName }}.dto';
import { {{ ServiceName }} } from './entities/{{ serviceName }}.schema';

@Injectable()
export class {{ ServiceName }}Service {
  constructor(@InjectModel('{{ ServiceName }}') private readonly {{ serviceName }}Model: Model<{{ ServiceName }}>) {}

  async create(create{{ ServiceName }}Dto: Create{{ ServiceName }}Dto): Promise<{{ ServiceName }}> {
    const created{{ ServiceName }} = new this.{{ serviceName }}Model(create{{ ServiceName }}Dto);
    return created{{ ServiceName }}.save();
  }

  async findAll(): Promise<{{ ServiceName }}[]> {
    return this.{{ serviceName }}Model.find().exec();
  }

  async findOne(id: string): Promise<{{ ServiceName }}> {
    return this.{{ serviceName }}Model.findById(id).exec();
  }

  async remove(id: string): Promise<void> {
    await this.{{ serviceName }}Model.findByIdAndDelete(id).exec();
  }
}
{% else %}
import { InjectRepository } from '@nestjs/typeorm';
import { Repository } from 'typeorm';
import { Create{{ ServiceName }}Dto } from './dto/create-{{ serviceName }}.dto';
import { {{ ServiceName }} } from './entities/{{ serviceName }}.entity';

@Injectable()
export class {{ ServiceName }}Service {
  constructor(
    @InjectRepository({{ ServiceName }})
    private readonly {{ serviceName }}Repository: Repository<{{ ServiceName }}>,
  ) {}

  async create(create{{ ServiceName }}Dto: Create{{ ServiceName }}Dto): Promise<{{ ServiceName }}> {
    const {{ serviceName }} = this.{{ serviceName }}Repository.create(create{{ ServiceName }}Dto);
    return this.{{ serviceName }}Repository.save({{ serviceName }});
  }

  async findAll(): Promise<{{ ServiceName }}[]> {
    return this.{{ serviceName }}Repository.find();
  }

  async findOne(id: string): Promise<{{ ServiceName }}> {
    return this.{{ serviceName }}Repository.findOne({ where: { id } });
  }

  async remove(id: string): Promise<void> {
    await this.{{ serviceName }}Repository.delete(id);
  }
}
{% endif %}
"#;

/// REST controller
pub const CONTROLLER_TS: &str = r#"import { Controller, Get, Post, Body, Param, Delete } from '@nestjs/common';
import { {{ ServiceName }}Service } from './{{ serviceName }}.service';
import { Create{{ ServiceName }}Dto } from './dto/create-{{ serviceName }}.dto';
{% if db == "mongodb" %}
import { {{ ServiceName }} } from './entities/{{ serviceName }}.schema';
{% else %}
import { {{ ServiceName }} } from './entities/{{ serviceName }}.entity';
{% endif %}

@Controller('{{ serviceName }}')
export class {{ ServiceName }}Controller {
  constructor(private readonly {{ serviceName }}Service: {{ ServiceName }}Service) {}

  @Get()
  findAll(): Promise<{{ ServiceName }}[]> {
    return this.{{ serviceName }}Service.findAll();
  }

  @Get(':id')
  findOne(@Param('id') id: string): Promise<{{ ServiceName }}> {
    return this.{{ serviceName }}Service.findOne(id);
  }

  @Post()
  create(@Body() create{{ ServiceName }}Dto: Create{{ ServiceName }}Dto): Promise<{{ ServiceName }}> {
    return this.{{ serviceName }}Service.create(create{{ ServiceName }}Dto);
  }

  @Delete(':id')
  remove(@Param('id') id: string): Promise<void> {
    return this.{{ serviceName }}Service.remove(id);
  }
}
"#;

/// Feature module with its own database connection
pub const MODULE_TS: &str = r#"import { Module } from '@nestjs/common';
{% if db == "mongodb" %}
import { MongooseModule } from '@nestjs/mongoose';
import { {{ ServiceName }}Service } from './{{ serviceName }}.service';
import { {{ ServiceName }}Controller } from './{{ serviceName }}.controller';
import { {{ ServiceName }}Schema } from './entities/{{ serviceName }}.schema';

@Module({
  imports: [
    MongooseModule.forRoot('{{ dbUri }}/{{ dbName }}'),
    MongooseModule.forFeature([{ name: '{{ ServiceName }}', schema: {{ ServiceName }}Schema }]),
  ],
{% else %}
import { TypeOrmModule } from '@nestjs/typeorm';
import { {{ ServiceName }}Service } from './{{ serviceName }}.service';
import { {{ ServiceName }}Controller } from './{{ serviceName }}.controller';
import { {{ ServiceName }} } from './entities/{{ serviceName }}.entity';

@Module({
  imports: [
    TypeOrmModule.forRoot({
      type: '{{ db }}',
{% if db == "sqlite" %}
      database: '{{ dbName }}.sqlite',
{% else %}
      host: '{{ dbHost }}',
      port: {{ dbPort }},
      username: '{{ dbUsername }}',
      password: '{{ dbPassword }}',
      database: '{{ dbName }}',
{% endif %}
      entities: [{{ ServiceName }}],
      synchronize: true,
    }),
    TypeOrmModule.forFeature([{{ ServiceName }}]),
  ],
{% endif %}
  controllers: [{{ ServiceName }}Controller],
  providers: [{{ ServiceName }}Service],
})
export class {{ ServiceName }}Module {}
"#;
