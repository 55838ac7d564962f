use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
    Name,
    Email,
    EmployeeCode,
    Department,
    Position,
    Salary,
    JoinDate,
    Phone,
    Address,
    Status,
    ManagerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Leave {
    Table,
    Id,
    EmployeeId,
    EmployeeName,
    LeaveType,
    StartDate,
    EndDate,
    TotalDays,
    Reason,
    Status,
    ApprovedBy,
    ApprovedDate,
    Comments,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payroll {
    Table,
    Id,
    EmployeeId,
    EmployeeName,
    PeriodMonth,
    PeriodYear,
    BasicSalary,
    AllowanceHra,
    AllowanceTransport,
    AllowanceMedical,
    AllowanceOther,
    OvertimeHours,
    OvertimeRate,
    OvertimeAmount,
    DeductionTax,
    DeductionPf,
    DeductionInsurance,
    DeductionOther,
    GrossSalary,
    TotalDeductions,
    NetSalary,
    Status,
    ProcessedDate,
    PaymentDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OfferLetter {
    Table,
    Id,
    CandidateName,
    CandidateEmail,
    Position,
    Department,
    Salary,
    Currency,
    StartDate,
    ReportingManager,
    WorkLocation,
    EmploymentType,
    Benefits,
    ProbationPeriodDays,
    NoticePeriodDays,
    OfferValidUntil,
    Status,
    SentDate,
    ResponseDate,
    HrContactName,
    HrContactEmail,
    HrContactPhone,
    AdditionalNotes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Recruitment {
    Table,
    Id,
    JobTitle,
    Department,
    JobDescription,
    Requirements,
    Location,
    EmploymentType,
    ExperienceLevel,
    SalaryMin,
    SalaryMax,
    Status,
    PostedDate,
    ClosingDate,
    ApplicantsCount,
    HiringManagerId,
    Skills,
    Benefits,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Review {
    Table,
    Id,
    EmployeeId,
    EmployeeName,
    ReviewerId,
    ReviewerName,
    PeriodStart,
    PeriodEnd,
    ReviewType,
    OverallRating,
    PerformanceRating,
    PerformanceComments,
    CommunicationRating,
    CommunicationComments,
    TeamworkRating,
    TeamworkComments,
    LeadershipRating,
    LeadershipComments,
    ProblemSolvingRating,
    ProblemSolvingComments,
    Strengths,
    AreasForImprovement,
    Goals,
    Feedback,
    EmployeeComments,
    Status,
    CompletedDate,
    AcknowledgedDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employee::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Employee::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Employee::Email).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Employee::EmployeeCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employee::Department)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employee::Position)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employee::Salary).double().not_null())
                    .col(ColumnDef::new(Employee::JoinDate).date().not_null())
                    .col(ColumnDef::new(Employee::Phone).string_len(32))
                    .col(ColumnDef::new(Employee::Address).string_len(512))
                    .col(ColumnDef::new(Employee::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Employee::ManagerId).uuid())
                    .col(
                        ColumnDef::new(Employee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Employee::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_manager")
                            .from(Employee::Table, Employee::ManagerId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_employee_email")
                    .table(Employee::Table)
                    .col(Employee::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_employee_code")
                    .table(Employee::Table)
                    .col(Employee::EmployeeCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_department")
                    .table(Employee::Table)
                    .col(Employee::Department)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Leave::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leave::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Leave::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(Leave::EmployeeName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Leave::LeaveType).string_len(32).not_null())
                    .col(ColumnDef::new(Leave::StartDate).date().not_null())
                    .col(ColumnDef::new(Leave::EndDate).date().not_null())
                    .col(ColumnDef::new(Leave::TotalDays).integer().not_null())
                    .col(ColumnDef::new(Leave::Reason).string_len(500).not_null())
                    .col(ColumnDef::new(Leave::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Leave::ApprovedBy).uuid())
                    .col(ColumnDef::new(Leave::ApprovedDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Leave::Comments).string_len(300))
                    .col(
                        ColumnDef::new(Leave::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Leave::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_employee")
                            .from(Leave::Table, Leave::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_approver")
                            .from(Leave::Table, Leave::ApprovedBy)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_leave_employee_status")
                    .table(Leave::Table)
                    .col(Leave::EmployeeId)
                    .col(Leave::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payroll::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payroll::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Payroll::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(Payroll::EmployeeName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payroll::PeriodMonth).small_integer().not_null())
                    .col(ColumnDef::new(Payroll::PeriodYear).integer().not_null())
                    .col(ColumnDef::new(Payroll::BasicSalary).double().not_null())
                    .col(ColumnDef::new(Payroll::AllowanceHra).double().not_null())
                    .col(
                        ColumnDef::new(Payroll::AllowanceTransport)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payroll::AllowanceMedical).double().not_null())
                    .col(ColumnDef::new(Payroll::AllowanceOther).double().not_null())
                    .col(ColumnDef::new(Payroll::OvertimeHours).double().not_null())
                    .col(ColumnDef::new(Payroll::OvertimeRate).double().not_null())
                    .col(ColumnDef::new(Payroll::OvertimeAmount).double().not_null())
                    .col(ColumnDef::new(Payroll::DeductionTax).double().not_null())
                    .col(ColumnDef::new(Payroll::DeductionPf).double().not_null())
                    .col(
                        ColumnDef::new(Payroll::DeductionInsurance)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payroll::DeductionOther).double().not_null())
                    .col(ColumnDef::new(Payroll::GrossSalary).double().not_null())
                    .col(ColumnDef::new(Payroll::TotalDeductions).double().not_null())
                    .col(ColumnDef::new(Payroll::NetSalary).double().not_null())
                    .col(ColumnDef::new(Payroll::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Payroll::ProcessedDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Payroll::PaymentDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Payroll::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Payroll::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payroll_employee")
                            .from(Payroll::Table, Payroll::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The bulk generator relies on this as the race-safety mechanism,
        // not on its existence pre-check.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_payroll_period")
                    .table(Payroll::Table)
                    .col(Payroll::EmployeeId)
                    .col(Payroll::PeriodMonth)
                    .col(Payroll::PeriodYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OfferLetter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OfferLetter::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::CandidateName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::CandidateEmail)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::Position)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::Department)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(OfferLetter::Salary).double().not_null())
                    .col(ColumnDef::new(OfferLetter::Currency).string_len(8).not_null())
                    .col(ColumnDef::new(OfferLetter::StartDate).date().not_null())
                    .col(
                        ColumnDef::new(OfferLetter::ReportingManager)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::WorkLocation)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::EmploymentType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(OfferLetter::Benefits).json_binary().not_null())
                    .col(
                        ColumnDef::new(OfferLetter::ProbationPeriodDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::NoticePeriodDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::OfferValidUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OfferLetter::Status).string_len(32).not_null())
                    .col(ColumnDef::new(OfferLetter::SentDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(OfferLetter::ResponseDate)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::HrContactName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::HrContactEmail)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::HrContactPhone)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(OfferLetter::AdditionalNotes).string_len(1000))
                    .col(
                        ColumnDef::new(OfferLetter::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(OfferLetter::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .to_owned(),
            )
            .await?;

        // Partial unique index: at most one Draft/Sent/Accepted offer per
        // candidate email. sea-query has no partial-index builder in 0.12.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_offer_active_candidate \
                 ON offer_letter (candidate_email) \
                 WHERE status IN ('DRAFT', 'SENT', 'ACCEPTED');",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recruitment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recruitment::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        ColumnDef::new(Recruitment::JobTitle)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recruitment::Department)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recruitment::JobDescription)
                            .string_len(2000)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recruitment::Requirements)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recruitment::Location)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recruitment::EmploymentType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recruitment::ExperienceLevel)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recruitment::SalaryMin).double().not_null())
                    .col(ColumnDef::new(Recruitment::SalaryMax).double().not_null())
                    .col(ColumnDef::new(Recruitment::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Recruitment::PostedDate).date().not_null())
                    .col(ColumnDef::new(Recruitment::ClosingDate).date().not_null())
                    .col(
                        ColumnDef::new(Recruitment::ApplicantsCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recruitment::HiringManagerId).uuid().not_null())
                    .col(ColumnDef::new(Recruitment::Skills).json_binary().not_null())
                    .col(ColumnDef::new(Recruitment::Benefits).json_binary().not_null())
                    .col(
                        ColumnDef::new(Recruitment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Recruitment::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recruitment_hiring_manager")
                            .from(Recruitment::Table, Recruitment::HiringManagerId)
                            .to(Employee::Table, Employee::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_recruitment_department_status")
                    .table(Recruitment::Table)
                    .col(Recruitment::Department)
                    .col(Recruitment::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Review::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(Review::EmployeeName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Review::ReviewerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Review::ReviewerName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Review::PeriodStart).date().not_null())
                    .col(ColumnDef::new(Review::PeriodEnd).date().not_null())
                    .col(ColumnDef::new(Review::ReviewType).string_len(32).not_null())
                    .col(ColumnDef::new(Review::OverallRating).double().not_null())
                    .col(
                        ColumnDef::new(Review::PerformanceRating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Review::PerformanceComments).string_len(500))
                    .col(
                        ColumnDef::new(Review::CommunicationRating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Review::CommunicationComments).string_len(500))
                    .col(
                        ColumnDef::new(Review::TeamworkRating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Review::TeamworkComments).string_len(500))
                    .col(
                        ColumnDef::new(Review::LeadershipRating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Review::LeadershipComments).string_len(500))
                    .col(
                        ColumnDef::new(Review::ProblemSolvingRating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Review::ProblemSolvingComments).string_len(500))
                    .col(ColumnDef::new(Review::Strengths).json_binary().not_null())
                    .col(
                        ColumnDef::new(Review::AreasForImprovement)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Review::Goals).json_binary().not_null())
                    .col(ColumnDef::new(Review::Feedback).string_len(1000).not_null())
                    .col(ColumnDef::new(Review::EmployeeComments).string_len(1000))
                    .col(ColumnDef::new(Review::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Review::CompletedDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Review::AcknowledgedDate)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Review::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_employee")
                            .from(Review::Table, Review::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_reviewer")
                            .from(Review::Table, Review::ReviewerId)
                            .to(Employee::Table, Employee::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_review_employee")
                    .table(Review::Table)
                    .col(Review::EmployeeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recruitment::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OfferLetter::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payroll::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leave::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
